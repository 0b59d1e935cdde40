use crate::flaps::FlapBox;
use crate::human::{check_flaps, check_num_dice, InputError};

#[test]
fn num_dice_accepts_valid_counts() {
    assert_eq!(check_num_dice("2", 2, 45, 6), Ok(2));
    assert_eq!(check_num_dice(" 1\n", 2, 6, 6), Ok(1));
}

#[test]
fn num_dice_rejects_garbage_and_range() {
    assert_eq!(
        check_num_dice("two", 2, 45, 6),
        Err(InputError::BadDiceCount { max: 2 })
    );
    assert_eq!(
        check_num_dice("3", 2, 45, 6),
        Err(InputError::BadDiceCount { max: 2 })
    );
    assert_eq!(
        check_num_dice("0", 2, 45, 6),
        Err(InputError::BadDiceCount { max: 2 })
    );
}

#[test]
fn single_die_only_when_sum_small_enough() {
    assert_eq!(
        check_num_dice("1", 2, 7, 6),
        Err(InputError::SingleDieNotAllowed { max_sum: 6 })
    );
    assert_eq!(
        InputError::SingleDieNotAllowed { max_sum: 6 }.to_string(),
        "You can only use a single die when the flap numbers add up to 6 or less"
    );
}

#[test]
fn flaps_valid_choice() {
    let b = FlapBox::new(9).unwrap();
    assert_eq!(check_flaps("3 4", &b, 7), Ok(vec![3, 4]));
    // Repeats are ignored.
    assert_eq!(check_flaps("7 7", &b, 7), Ok(vec![7]));
}

#[test]
fn flaps_empty_means_stop() {
    let b = FlapBox::new(9).unwrap();
    assert_eq!(check_flaps("   ", &b, 7), Ok(vec![]));
}

#[test]
fn flaps_invalid_choices() {
    let mut b = FlapBox::new(9).unwrap();
    b.lower(4).unwrap();
    assert_eq!(
        check_flaps("x", &b, 7),
        Err(InputError::NotAFlap("x".to_string()))
    );
    assert_eq!(
        check_flaps("10", &b, 10),
        Err(InputError::NotAFlap("10".to_string()))
    );
    assert_eq!(check_flaps("3 4", &b, 7), Err(InputError::AlreadyDown(4)));
    assert_eq!(check_flaps("2 3", &b, 7), Err(InputError::WrongTotal));
}
