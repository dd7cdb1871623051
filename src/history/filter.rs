use crate::history::model::ActivityEdge;

/// Keep edges whose decoded description has `field == filter`. An absent or
/// empty filter keeps everything.
pub fn filter_by_field(edges: Vec<ActivityEdge>, filter: Option<&str>) -> Vec<ActivityEdge> {
    let Some(wanted) = filter.filter(|f| !f.is_empty()) else {
        return edges;
    };

    edges
        .into_iter()
        .filter(|edge| {
            edge.node
                .as_ref()
                .and_then(|node| node.description_field())
                == Some(wanted)
        })
        .collect()
}
