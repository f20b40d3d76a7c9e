use mlnet_core::MlnError;
use mlnet_iso::Capability;

#[test]
fn queries_fail_until_backends_are_initialised() {
    let err = match mlnet_iso::backend_for(Capability::IsIsomorphic) {
        Ok(backend) => panic!("unexpected backend {}", backend.name()),
        Err(err) => err,
    };
    assert!(matches!(err, MlnError::BackendMissing(_)));
    assert_eq!(err.code(), "registry-uninitialised");
    assert!(mlnet_iso::registry().is_err());

    mlnet_iso::init_backends();
    let backend = mlnet_iso::backend_for(Capability::IsIsomorphic).unwrap();
    assert_eq!(backend.name(), "permutation");
}
