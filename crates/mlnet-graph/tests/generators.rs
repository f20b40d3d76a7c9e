use mlnet_core::rng::RngHandle;
use mlnet_core::{labels, Direction, MlnError, Network};
use mlnet_graph::{canonical_hash, er, er_multilayer, er_partially_interconnected};

#[test]
fn partially_interconnected_complete_network() -> Result<(), MlnError> {
    let mut rng = RngHandle::from_seed(3);
    let layers = vec![labels([1, 2, 3]), labels([2, 3, 4]), labels([4, 1, 2])];
    let net = er_partially_interconnected(&layers, 1.0, &mut rng)?;
    assert!(!net.is_fully_interconnected());
    assert_eq!(net.node_layers().count(), 9);
    for nl in net.node_layers() {
        assert_eq!(net.degree(&nl, Direction::Total), 8);
    }
    Ok(())
}

#[test]
fn generators_are_deterministic_per_seed() -> Result<(), MlnError> {
    let first = er(10, &[0.3, 0.5, 0.2], &mut RngHandle::from_seed(11))?;
    let second = er(10, &[0.3, 0.5, 0.2], &mut RngHandle::from_seed(11))?;
    assert_eq!(first, second);
    assert_eq!(canonical_hash(&first), canonical_hash(&second));

    let a = er_multilayer(6, 2, 0.4, &mut RngHandle::from_seed(5))?;
    let b = er_multilayer(6, 2, 0.4, &mut RngHandle::from_seed(5))?;
    assert_eq!(a, b);
    Ok(())
}

#[test]
fn invalid_probability_is_rejected() {
    let mut rng = RngHandle::from_seed(0);
    let err = er(4, &[1.5], &mut rng).unwrap_err();
    assert!(matches!(err, MlnError::Requirement(_)));
}
