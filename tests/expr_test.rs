//! Properties of expression trees, exercised through the public API.

use std::thread;

use addtree::{Expr, Integer, Leaf, Sum, eval};
use rstest::rstest;

#[test]
fn given_reference_trees_when_combined_then_evaluates_to_21() {
    // Arrange
    let a1 = Sum::from_integers(6, 7);
    let b1 = Sum::from_integers(7, 1);

    // Act
    let combined = a1.add(b1.clone());

    // Assert
    assert_eq!(a1.evaluate(), 13);
    assert_eq!(b1.evaluate(), 8);
    assert_eq!(combined.evaluate(), 21);
    assert_eq!(combined.to_string(), "((6 + 7) + (7 + 1))");
}

#[rstest]
#[case(Expr::from(5_i64), Expr::from(-5_i64))]
#[case(Sum::from_integers(1, 2).into(), Leaf::new(40).into())]
#[case(Sum::from_integers(6, 7).into(), Sum::from_integers(7, 1).add(3_i64).into())]
fn given_two_trees_when_summed_then_children_add_in_either_order(
    #[case] x: Expr,
    #[case] y: Expr,
) {
    let xy = Sum::new(x.clone(), y.clone());
    let yx = Sum::new(y.clone(), x.clone());

    assert_eq!(xy.evaluate(), x.evaluate() + y.evaluate());
    assert_eq!(xy.evaluate(), yx.evaluate());
}

#[rstest]
#[case(0)]
#[case(1)]
#[case(25)]
#[case(500)]
#[case(200_000)]
fn given_sum_when_adding_one_n_times_then_grows_by_n(#[case] n: usize) {
    let original = Sum::from_integers(2, 3);

    let mut grown = original.clone();
    for _ in 0..n {
        grown = grown.add(1_i64);
    }

    assert_eq!(grown.evaluate(), original.evaluate() + n as Integer);
    assert_eq!(original.evaluate(), 5);
}

#[test]
fn given_chain_when_evaluated_then_matches_iterator_sum() {
    let values: Vec<Integer> = (-50..=100).collect();

    let expr = Expr::chain(values.iter().copied()).unwrap();

    assert_eq!(expr.evaluate(), values.iter().sum::<Integer>());
    assert_eq!(eval::evaluate(&expr), Ok(values.iter().sum::<Integer>()));
    assert_eq!(expr.leaves(), values.len());
}

#[test]
fn given_shared_tree_when_evaluated_from_threads_then_results_agree() {
    let expr = Expr::from(Sum::from_integers(6, 7).add(Sum::from_integers(7, 1)));

    let results: Vec<Integer> = thread::scope(|scope| {
        let handles: Vec<_> = (0..4).map(|_| scope.spawn(|| expr.evaluate())).collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(results, vec![21; 4]);
}

#[test]
fn given_overflowing_tree_when_checked_then_error_instead_of_wrap() {
    let expr = Expr::from(Sum::from_integers(Integer::MAX, 0).add(Integer::MAX));

    assert_eq!(expr.evaluate(), -2);
    assert!(matches!(
        eval::evaluate(&expr),
        Err(eval::Error::Overflow { .. })
    ));
}
