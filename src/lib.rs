#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

mod bitboard;
mod common;
mod config;
pub mod controller;
pub mod coord_list;
pub mod domain;
mod grid;
pub mod notation;
pub mod session;
#[cfg(feature = "std")]
pub mod client_node;
#[cfg(feature = "std")]
mod logging;
#[cfg(feature = "std")]
mod player_cli;
#[cfg(feature = "std")]
pub mod protocol;
#[cfg(feature = "std")]
pub mod skeleton;
#[cfg(feature = "std")]
pub mod stub;
#[cfg(feature = "std")]
pub mod transport;

pub use bitboard::{BitBoard, BitBoardError, TileSet};
pub use common::*;
pub use config::*;
pub use controller::{
    Applied, BoardController, Command, Completion, Phase, ResponseError, Selection, Ticket,
};
pub use coord_list::{format_coord_list, parse_coord_list, CoordListError};
pub use domain::{ApiError, PositionResponse};
pub use grid::{Cell, CellView, Grid};
pub use notation::{
    decode, decode_lenient, encode, DecodeError, DecodedPosition, StatusSuffix, START_POSITION,
};
pub use session::{two_viking_names, viking_name, SessionContext, SessionError, SessionHost};
#[cfg(feature = "std")]
pub use client_node::{execute, ClientNode, ClientSnapshot, NodeExit, UiEvent};
#[cfg(feature = "std")]
pub use logging::{init_logging, init_logging_with, LOG_ENV};
#[cfg(feature = "std")]
pub use player_cli::*;
#[cfg(feature = "std")]
pub use protocol::{GameApi, Message};
#[cfg(feature = "std")]
pub use skeleton::Skeleton;
#[cfg(feature = "std")]
pub use stub::Stub;
#[cfg(feature = "std")]
pub use transport::{in_memory::InMemoryTransport, is_closed, tcp::TcpTransport, Closed, Transport};
