use std::collections::BTreeSet;

use mlnet_core::rng::RngHandle;
use mlnet_core::{labels, Label, MlnError, NetworkConfig, NetworkMut, NodeLayer};
use mlnet_esu::{
    brute_force, sample, sample_to_vec, Esu, Mode, Requirement, SamplerConfig, Subgraph,
};
use mlnet_graph::{er, er_partially_interconnected, MultilayerNetwork};

fn lattice() -> Result<MultilayerNetwork, MlnError> {
    let mut net = MultilayerNetwork::new(NetworkConfig::with_aspects(1).fully_interconnected(false));
    net.set_weight(&NodeLayer::single(1, "X"), &NodeLayer::single(1, "Y"), 1.0)?;
    net.set_weight(&NodeLayer::single(1, "X"), &NodeLayer::single(2, "X"), 1.0)?;
    Ok(net)
}

fn sorted(mut found: Vec<Subgraph>) -> Vec<Subgraph> {
    found.sort();
    found
}

#[test]
fn strict_requirement_on_small_lattice() -> Result<(), MlnError> {
    let net = lattice()?;
    let config = SamplerConfig::new(Requirement::strict(vec![1, 2], vec![Some(1)]));
    let found = sample_to_vec(&net, &config)?;
    assert_eq!(found, vec![Subgraph::new(labels([1, 2]), labels(["X", "Y"]))]);
    Ok(())
}

#[test]
fn esu_matches_brute_force_on_multiplexes() -> Result<(), MlnError> {
    let requirements = [
        (Requirement::Relaxed { nnodes: 2, nlayers: 2 }, Mode::Exact),
        (Requirement::Relaxed { nnodes: 3, nlayers: 2 }, Mode::Exact),
        (Requirement::Relaxed { nnodes: 3, nlayers: 2 }, Mode::LessOrEqual),
        (Requirement::strict(vec![2, 2], vec![Some(1)]), Mode::Exact),
        (Requirement::strict(vec![2, 3], vec![Some(2)]), Mode::Exact),
        (Requirement::strict(vec![1, 2, 2], vec![Some(1), Some(1), Some(1), Some(1)]), Mode::Exact),
        (
            Requirement::Strict {
                sizes: vec![2, 2],
                intersections: vec![Some(2)],
                nnodes: Some(3),
            },
            Mode::LessOrEqual,
        ),
        (
            Requirement::Common {
                sizes: vec![2, 2, 2],
                common: 1,
                nnodes: 3,
            },
            Mode::Exact,
        ),
    ];
    for seed in 0..3 {
        let net = er(6, &[0.4, 0.4, 0.4], &mut RngHandle::from_seed(seed))?;
        for (requirement, mode) in &requirements {
            let config = SamplerConfig::new(requirement.clone()).with_mode(*mode);
            let esu = sorted(sample_to_vec(&net, &config)?);
            let reference = brute_force(&net, requirement, *mode, None)?;
            assert_eq!(esu, reference, "seed {seed} requirement {requirement:?}");
        }
    }
    Ok(())
}

#[test]
fn esu_matches_brute_force_on_partial_networks() -> Result<(), MlnError> {
    let layers = vec![labels([1, 2, 3, 4]), labels([2, 3, 4, 5]), labels([5, 1, 2])];
    for seed in 0..4 {
        let net = er_partially_interconnected(&layers, 0.35, &mut RngHandle::from_seed(seed))?;
        for requirement in [
            Requirement::Relaxed { nnodes: 2, nlayers: 2 },
            Requirement::Relaxed { nnodes: 3, nlayers: 3 },
            Requirement::strict(vec![2, 1], vec![Some(1)]),
        ] {
            let config = SamplerConfig::new(requirement.clone());
            let esu = sorted(sample_to_vec(&net, &config)?);
            assert_eq!(esu, brute_force(&net, &requirement, Mode::Exact, None)?);
        }
    }
    Ok(())
}

#[test]
fn every_subgraph_is_reported_once() -> Result<(), MlnError> {
    let net = er(7, &[0.5, 0.5], &mut RngHandle::from_seed(17))?;
    let config = SamplerConfig::new(Requirement::Relaxed { nnodes: 3, nlayers: 2 });
    let found = sample_to_vec(&net, &config)?;
    let unique: BTreeSet<&Subgraph> = found.iter().collect();
    assert_eq!(unique.len(), found.len());
    assert!(!found.is_empty());
    Ok(())
}

#[test]
fn custom_check_filters_hits() -> Result<(), MlnError> {
    let net = er(6, &[0.5, 0.5], &mut RngHandle::from_seed(4))?;
    let config = SamplerConfig::new(Requirement::Relaxed { nnodes: 2, nlayers: 2 });
    let zero = Label::from(0);
    let with_zero = |subgraph: &Subgraph| subgraph.nodes.contains(&zero);
    let found = sorted(Esu::new(&net, config.clone())?.with_check(with_zero).collect()?);
    let reference = brute_force(&net, &config.requirement, config.mode, Some(&with_zero))?;
    assert_eq!(found, reference);
    assert!(found.iter().all(|subgraph| subgraph.nodes.contains(&zero)));
    Ok(())
}

#[test]
fn sink_errors_abort_the_run() -> Result<(), MlnError> {
    let net = er(6, &[0.6, 0.6], &mut RngHandle::from_seed(8))?;
    let config = SamplerConfig::new(Requirement::Relaxed { nnodes: 2, nlayers: 1 });
    let mut seen = 0;
    let result = sample(&net, &config, &mut |_| {
        seen += 1;
        Err(MlnError::Cancelled(mlnet_core::ErrorInfo::new("stop", "enough")))
    });
    assert!(matches!(result, Err(MlnError::Cancelled(_))));
    assert_eq!(seen, 1);
    Ok(())
}

#[test]
fn sampling_is_deterministic_and_full_probability_enumerates() -> Result<(), MlnError> {
    let net = er(6, &[0.5, 0.5], &mut RngHandle::from_seed(2))?;
    let requirement = Requirement::Relaxed { nnodes: 2, nlayers: 2 };
    let all = sorted(sample_to_vec(&net, &SamplerConfig::new(requirement.clone()))?);

    let certain = SamplerConfig::new(requirement.clone()).with_sampling(vec![1.0; 3], 3);
    assert_eq!(sorted(sample_to_vec(&net, &certain)?), all);

    let half = SamplerConfig::new(requirement).with_sampling(vec![0.5; 3], 3);
    let first = sample_to_vec(&net, &half)?;
    assert_eq!(first, sample_to_vec(&net, &half)?);
    assert!(first.iter().all(|subgraph| all.contains(subgraph)));
    Ok(())
}

#[test]
fn invalid_configurations_are_rejected() -> Result<(), MlnError> {
    let net = lattice()?;
    let bad_count = SamplerConfig::new(Requirement::strict(vec![1, 2], vec![Some(1), Some(1)]));
    assert_eq!(sample_to_vec(&net, &bad_count).unwrap_err().code(), "intersection-count");

    let bad_depth = SamplerConfig::new(Requirement::strict(vec![1, 2], vec![Some(1)]))
        .with_sampling(vec![0.5; 2], 0);
    let err = sample_to_vec(&net, &bad_depth).unwrap_err();
    assert!(matches!(err, MlnError::Requirement(_)));
    assert_eq!(err.code(), "sampling-depth");

    // one entry per node-layer is the wrong depth unit
    let per_node_layer = SamplerConfig::new(Requirement::Relaxed { nnodes: 2, nlayers: 2 })
        .with_sampling(vec![0.5; 4], 0);
    let err = per_node_layer.validate().unwrap_err();
    assert_eq!(err.code(), "sampling-depth");
    assert_eq!(err.info().context.get("expected").map(String::as_str), Some("3"));

    let impossible = SamplerConfig::new(Requirement::strict(vec![1, 1], vec![Some(3)]));
    assert_eq!(
        sample_to_vec(&net, &impossible).unwrap_err().code(),
        "inconsistent-intersections"
    );

    let two_aspects = MultilayerNetwork::with_aspects(2);
    let relaxed = SamplerConfig::new(Requirement::Relaxed { nnodes: 1, nlayers: 1 });
    assert!(matches!(
        sample_to_vec(&two_aspects, &relaxed),
        Err(MlnError::Unsupported(_))
    ));
    Ok(())
}

#[test]
fn yaml_configuration() -> Result<(), MlnError> {
    let config = SamplerConfig::from_yaml_str(
        "requirement:\n  kind: strict\n  sizes: [1, 2]\n  intersections: [1]\np: [1.0, 1.0, 1.0]\nseed: 11\n",
    )?;
    assert_eq!(config.mode, Mode::Exact);
    assert_eq!(config.seed, 11);
    assert_eq!(config.requirement, Requirement::strict(vec![1, 2], vec![Some(1)]));
    assert_eq!(sample_to_vec(&lattice()?, &config)?.len(), 1);

    let wildcard = SamplerConfig::from_yaml_str(
        "requirement:\n  kind: strict\n  sizes: [2, 2]\n  intersections: [~]\n  nnodes: 3\nmode: less-or-equal\n",
    )?;
    assert_eq!(wildcard.mode, Mode::LessOrEqual);
    assert!(wildcard.validate().is_ok());

    assert_eq!(
        SamplerConfig::from_yaml_str("requirement: 3").unwrap_err().code(),
        "config-parse"
    );
    Ok(())
}
