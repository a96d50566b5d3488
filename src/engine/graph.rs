use eframe::egui::Color32;
use rand::Rng;

/// A directed reference between two node indices. Targets always point at
/// earlier-created nodes, so the link set is a forest-like DAG by
/// construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Link {
    pub source: usize,
    pub target: usize,
    /// Palette group inherited from the source node.
    pub group: usize,
}

pub struct GraphTopology {
    pub groups: Vec<usize>,
    pub colors: Vec<Color32>,
    pub links: Vec<Link>,
}

impl GraphTopology {
    pub fn node_count(&self) -> usize {
        self.groups.len()
    }
}

/// Builds the fixed node set and a sparse set of backward-pointing links.
/// Deterministic shape, not deterministic values: the caller supplies the rng.
pub fn generate(node_count: usize, palette: &[Color32], rng: &mut impl Rng) -> GraphTopology {
    let palette_size = palette.len().max(1);
    let mut groups = Vec::with_capacity(node_count);
    let mut colors = Vec::with_capacity(node_count);
    let mut links = Vec::new();

    for index in 0..node_count {
        let group = index % palette_size;
        groups.push(group);
        colors.push(palette.get(group).copied().unwrap_or(Color32::WHITE));

        if index == 0 {
            continue;
        }

        // Two nested thresholds, not one flat draw; keeps the rendered graph
        // mostly sparse with occasional denser stretches.
        if rng.gen_range(0.0..1.0f32) < 0.6 || rng.gen_range(0.0..1.0f32) < 0.7 {
            let target = rng.gen_range(0..index);
            links.push(Link {
                source: index,
                target,
                group,
            });
        }
    }

    GraphTopology {
        groups,
        colors,
        links,
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    fn palette() -> Vec<Color32> {
        vec![
            Color32::from_rgb(90, 162, 255),
            Color32::from_rgb(143, 123, 255),
            Color32::from_rgb(63, 212, 192),
        ]
    }

    #[test]
    fn node_count_and_groups_match_contract() {
        let mut rng = StdRng::seed_from_u64(11);
        let topology = generate(10, &palette(), &mut rng);

        assert_eq!(topology.node_count(), 10);
        for (index, group) in topology.groups.iter().enumerate() {
            assert_eq!(*group, index % 3);
        }
    }

    #[test]
    fn links_only_point_backward() {
        let mut rng = StdRng::seed_from_u64(7);
        let topology = generate(500, &palette(), &mut rng);

        for link in &topology.links {
            assert!(link.target < link.source, "{link:?}");
            assert_eq!(link.group, topology.groups[link.source]);
        }
        assert!(!topology.links.iter().any(|link| link.source == 0));
    }

    #[test]
    fn at_most_one_outgoing_link_per_node() {
        let mut rng = StdRng::seed_from_u64(3);
        let topology = generate(400, &palette(), &mut rng);

        let mut seen = vec![0usize; 400];
        for link in &topology.links {
            seen[link.source] += 1;
        }
        assert!(seen.iter().all(|&count| count <= 1));
    }

    #[test]
    fn sparsity_stays_in_the_qualitative_band() {
        let mut rng = StdRng::seed_from_u64(42);
        let topology = generate(4_000, &palette(), &mut rng);

        // 60-95% of eligible nodes gain one edge; assert the band, not an
        // exact density.
        let ratio = topology.links.len() as f32 / 3_999.0;
        assert!((0.55..=0.97).contains(&ratio), "ratio {ratio}");
    }

    #[test]
    fn degenerate_sizes_return_empty_link_sets() {
        let mut rng = StdRng::seed_from_u64(1);

        let empty = generate(0, &palette(), &mut rng);
        assert_eq!(empty.node_count(), 0);
        assert!(empty.links.is_empty());

        let single = generate(1, &palette(), &mut rng);
        assert_eq!(single.node_count(), 1);
        assert!(single.links.is_empty());
    }
}
