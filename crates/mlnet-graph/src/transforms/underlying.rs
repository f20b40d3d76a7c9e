use mlnet_core::{Label, MlnError, Network, NetworkConfig, NetworkMut, NodeLayer};

use crate::multilayer::MultilayerNetwork;

/// Monoplex skeleton of `net`: one vertex per node-layer, labelled with its
/// canonical string, and the original edges with their weights.
pub fn underlying_graph<N: Network + ?Sized>(net: &N) -> Result<MultilayerNetwork, MlnError> {
    let config = NetworkConfig::default()
        .directed(net.is_directed())
        .no_edge(net.no_edge());
    let mut graph = MultilayerNetwork::new(config);
    let vertex = |nl: &NodeLayer| NodeLayer::monoplex(Label::from(nl.canonical_string()));
    for nl in net.node_layers() {
        graph.add_node_layer(&vertex(&nl))?;
    }
    for edge in net.edges() {
        graph.set_weight(&vertex(&edge.source), &vertex(&edge.target), edge.weight)?;
    }
    Ok(graph)
}
