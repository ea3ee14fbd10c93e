use tafl_client::{BitBoard, BitBoardError, Coord, TileSet};

#[test]
fn test_try_new_sizes() {
    assert!(BitBoard::<u64, 8>::try_new().is_ok());
    assert!(matches!(
        BitBoard::<u8, 3>::try_new(),
        Err(BitBoardError::SizeTooLarge { .. })
    ));
}

#[test]
fn test_get_set_clear() {
    let mut bb = BitBoard::<u16, 4>::new();
    assert!(bb.is_empty());

    bb.set(1, 1).unwrap();
    assert!(bb.get(1, 1).unwrap());
    bb.clear(1, 1).unwrap();
    assert!(!bb.get(1, 1).unwrap());

    assert_eq!(
        bb.set(4, 0),
        Err(BitBoardError::IndexOutOfBounds { row: 4, col: 0 })
    );
}

#[test]
fn test_from_iter_and_iter() {
    let bb = BitBoard::<u16, 4>::from_iter([(0, 1), (3, 3)]).unwrap();
    let bits: Vec<_> = bb.iter_set_bits().collect();
    assert_eq!(bits, vec![(0, 1), (3, 3)]);
}

#[test]
fn test_tile_set_as_coordinate_set() {
    let mut a = TileSet::new();
    a.insert(Coord::new(0, 3)).unwrap();
    a.insert(Coord::new(5, 5)).unwrap();
    let mut b = TileSet::new();
    b.insert(Coord::new(5, 5)).unwrap();
    b.insert(Coord::new(10, 0)).unwrap();

    assert_eq!((a & b).coords().collect::<Vec<_>>(), vec![Coord::new(5, 5)]);
    assert_eq!((a | b).count_ones(), 3);
    assert_eq!(format!("{:?}", a & b), "{(5, 5)}");
}
