use std::collections::BinaryHeap;

use ordered_float::OrderedFloat;

use crate::{
    bbox::BoundingBox,
    distance::{approx_eq, euclidean, EPSILON},
    node::{Node, NodeEntries},
    sphere::Sphere,
};

/// SR-tree spatial index over `D`-dimensional points.
///
/// Nodes live in an arena and reference each other by slot id; every node
/// keeps an axis-aligned bounding box and a bounding sphere over its
/// contents. Insertion descends along the least box-volume increase,
/// splitting nodes that exceed `max_entries` and growing the tree at the
/// root.
pub struct Srindex<const D: usize> {
    max_entries: usize,
    root: usize,
    nodes: Vec<Node<D>>,
    num_points: usize,
}

impl<const D: usize> Srindex<D> {
    #[must_use]
    pub fn new(max_entries: usize) -> Option<Self> {
        if max_entries < 2 {
            return None;
        }
        Some(Srindex {
            max_entries,
            root: usize::MAX,
            nodes: Vec::new(),
            num_points: 0,
        })
    }

    pub fn insert(&mut self, point: [f64; D]) {
        // Create the root node if it doesn't exist
        if self.root == usize::MAX {
            self.root = self.add_slot(Node::leaf(Vec::new()));
        }

        self.num_points += 1;

        // A split at the root grows the tree by one level
        if let Some(sibling) = self.insert_recursive(self.root, point) {
            let old_root = self.root;
            let new_root = self.add_slot(Node::internal(vec![old_root, sibling]));
            self.nodes[old_root].parent = new_root;
            self.nodes[sibling].parent = new_root;
            self.update_bounding_volumes(new_root);
            self.root = new_root;
        }
    }

    /// Exact membership test, component-wise within tolerance.
    #[must_use]
    pub fn contains(&self, point: &[f64; D]) -> bool {
        if self.root == usize::MAX {
            return false;
        }
        self.contains_recursive(self.root, point)
    }

    /// All stored points inside the query box, in traversal order.
    #[must_use]
    pub fn query_box(&self, query: &BoundingBox<D>) -> Vec<[f64; D]> {
        let mut result = Vec::new();
        if self.root != usize::MAX {
            self.query_box_recursive(self.root, query, &mut result);
        }
        result
    }

    /// All stored points inside the query sphere, in traversal order.
    #[must_use]
    pub fn query_sphere(&self, query: &Sphere<D>) -> Vec<[f64; D]> {
        let mut result = Vec::new();
        if self.root != usize::MAX {
            self.query_sphere_recursive(self.root, query, &mut result);
        }
        result
    }

    /// The `k` stored points closest to `point`, nearest first. Returns fewer
    /// than `k` points when the index holds fewer.
    #[must_use]
    pub fn query_neighbors(&self, point: &[f64; D], k: usize) -> Vec<[f64; D]> {
        if self.root == usize::MAX || k == 0 {
            return Vec::new();
        }
        let mut neighbors = BinaryHeap::new();
        self.query_neighbors_recursive(self.root, point, k, &mut neighbors);
        neighbors
            .into_sorted_vec()
            .into_iter()
            .map(|(_, leaf_id, entry)| self.leaf_point(leaf_id, entry))
            .collect()
    }

    #[must_use]
    pub fn height(&self) -> usize {
        if self.root == usize::MAX {
            return 0;
        }
        // All leaves sit at the same depth; follow any path down
        let mut height = 1;
        let mut node_id = self.root;
        while let NodeEntries::Children(children) = &self.nodes[node_id].entries {
            node_id = children[0];
            height += 1;
        }
        height
    }

    #[must_use]
    pub fn num_points(&self) -> usize {
        self.num_points
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.num_points == 0
    }

    /// Bounding box of the whole index, `None` while empty.
    #[must_use]
    pub fn bounding_box(&self) -> Option<BoundingBox<D>> {
        self.nodes.get(self.root).map(|node| node.bbox)
    }

    /// Bounding sphere of the whole index, `None` while empty.
    #[must_use]
    pub fn bounding_sphere(&self) -> Option<Sphere<D>> {
        self.nodes.get(self.root).map(|node| node.sphere)
    }

    // Insert a point below a node, splitting on overflow. Returns the slot of
    // the newly created sibling when the node was split.
    fn insert_recursive(&mut self, node_id: usize, point: [f64; D]) -> Option<usize> {
        if self.nodes[node_id].is_leaf() {
            let node = &mut self.nodes[node_id];
            if let NodeEntries::Points(points) = &mut node.entries {
                points.push(point);
                if points.len() == 1 {
                    node.bbox = BoundingBox::point(point);
                    node.sphere = Sphere::point(point);
                } else {
                    node.bbox.expand_to_include(&point);
                    node.sphere.expand_to_include(&point);
                }
            }
        } else {
            let best_child = self.choose_subtree(node_id, &point);
            if let Some(sibling) = self.insert_recursive(best_child, point) {
                self.nodes[sibling].parent = node_id;
                if let NodeEntries::Children(children) = &mut self.nodes[node_id].entries {
                    children.push(sibling);
                }
            }
            // Re-merge over all children so both volumes stay consistent
            self.update_bounding_volumes(node_id);
        }

        if self.nodes[node_id].num_entries() > self.max_entries {
            return Some(self.split(node_id));
        }
        None
    }

    // Choose the child whose bounding box grows the least, first one on ties.
    fn choose_subtree(&self, node_id: usize, point: &[f64; D]) -> usize {
        let mut best_child = usize::MAX;
        let mut best_increase = f64::INFINITY;
        if let NodeEntries::Children(children) = &self.nodes[node_id].entries {
            for &child_id in children {
                let increase = self.nodes[child_id].bbox.volume_increase(point);
                if increase < best_increase {
                    best_increase = increase;
                    best_child = child_id;
                }
            }
        }
        best_child
    }

    // Positional bisection: the upper half of the entries moves out, in
    // storage order, into a new sibling of the same kind.
    fn split(&mut self, node_id: usize) -> usize {
        let parent = self.nodes[node_id].parent;
        let sibling = match &mut self.nodes[node_id].entries {
            NodeEntries::Points(points) => {
                let upper = points.split_off(points.len() / 2);
                Node::leaf(upper)
            }
            NodeEntries::Children(children) => {
                let upper = children.split_off(children.len() / 2);
                Node::internal(upper)
            }
        };
        let sibling_id = self.add_slot(sibling);
        self.nodes[sibling_id].parent = parent;

        // Children moved into the sibling answer to it from now on
        let moved = match &self.nodes[sibling_id].entries {
            NodeEntries::Children(children) => children.clone(),
            NodeEntries::Points(_) => Vec::new(),
        };
        for child_id in moved {
            self.nodes[child_id].parent = sibling_id;
        }

        self.update_bounding_volumes(node_id);
        self.update_bounding_volumes(sibling_id);
        sibling_id
    }

    // Recompute both bounding volumes from the node's direct contents.
    fn update_bounding_volumes(&mut self, node_id: usize) {
        let volumes = match &self.nodes[node_id].entries {
            NodeEntries::Points(points) => match points.split_first() {
                Some((first, rest)) => {
                    let mut bbox = BoundingBox::point(*first);
                    let mut sphere = Sphere::point(*first);
                    for p in rest {
                        bbox.expand_to_include(p);
                        sphere.expand_to_include(p);
                    }
                    Some((bbox, sphere))
                }
                None => None,
            },
            NodeEntries::Children(children) => match children.split_first() {
                Some((&first, rest)) => {
                    let mut bbox = self.nodes[first].bbox;
                    let mut sphere = self.nodes[first].sphere;
                    for &child_id in rest {
                        bbox.expand_to_include_box(&self.nodes[child_id].bbox);
                        sphere.expand_to_include_sphere(&self.nodes[child_id].sphere);
                    }
                    Some((bbox, sphere))
                }
                None => None,
            },
        };
        if let Some((bbox, sphere)) = volumes {
            self.nodes[node_id].bbox = bbox;
            self.nodes[node_id].sphere = sphere;
        }
    }

    fn contains_recursive(&self, node_id: usize, point: &[f64; D]) -> bool {
        match &self.nodes[node_id].entries {
            NodeEntries::Points(points) => points.iter().any(|p| approx_eq(p, point)),
            NodeEntries::Children(children) => children.iter().any(|&child_id| {
                self.nodes[child_id].bbox.contains(point)
                    && self.contains_recursive(child_id, point)
            }),
        }
    }

    fn query_box_recursive(
        &self,
        node_id: usize,
        query: &BoundingBox<D>,
        result: &mut Vec<[f64; D]>,
    ) {
        match &self.nodes[node_id].entries {
            NodeEntries::Points(points) => {
                for p in points {
                    if query.contains(p) {
                        result.push(*p);
                    }
                }
            }
            NodeEntries::Children(children) => {
                for &child_id in children {
                    if self.nodes[child_id].bbox.intersects(query) {
                        self.query_box_recursive(child_id, query, result);
                    }
                }
            }
        }
    }

    fn query_sphere_recursive(
        &self,
        node_id: usize,
        query: &Sphere<D>,
        result: &mut Vec<[f64; D]>,
    ) {
        match &self.nodes[node_id].entries {
            NodeEntries::Points(points) => {
                for p in points {
                    if query.contains(p) {
                        result.push(*p);
                    }
                }
            }
            NodeEntries::Children(children) => {
                for &child_id in children {
                    let child = &self.nodes[child_id];
                    // Coarse prune on the bounding spheres first
                    if child.sphere.min_distance(&query.center) > query.radius + EPSILON {
                        continue;
                    }
                    if child.bbox.min_distance(&query.center) > query.radius + EPSILON {
                        continue;
                    }
                    self.query_sphere_recursive(child_id, query, result);
                }
            }
        }
    }

    // Branch-and-bound descent: children are visited in order of the lower
    // bound on their achievable distance, and skipped entirely once that
    // bound reaches the current k-th best.
    fn query_neighbors_recursive(
        &self,
        node_id: usize,
        point: &[f64; D],
        k: usize,
        neighbors: &mut BinaryHeap<(OrderedFloat<f64>, usize, usize)>,
    ) {
        match &self.nodes[node_id].entries {
            NodeEntries::Points(points) => {
                for (entry, p) in points.iter().enumerate() {
                    let distance = euclidean(point, p);
                    if neighbors.len() < k {
                        neighbors.push((OrderedFloat(distance), node_id, entry));
                    } else if distance < neighbors.peek().unwrap().0.into_inner() {
                        neighbors.pop();
                        neighbors.push((OrderedFloat(distance), node_id, entry));
                    }
                }
            }
            NodeEntries::Children(children) => {
                let mut to_visit = children
                    .iter()
                    .map(|&child_id| {
                        let bound = self.nodes[child_id].bbox.min_distance(point);
                        (OrderedFloat(bound), child_id)
                    })
                    .collect::<Vec<_>>();
                to_visit.sort();

                for (bound, child_id) in to_visit {
                    if neighbors.len() == k
                        && bound.into_inner() >= neighbors.peek().unwrap().0.into_inner()
                    {
                        break;
                    }
                    self.query_neighbors_recursive(child_id, point, k, neighbors);
                }
            }
        }
    }

    fn leaf_point(&self, node_id: usize, entry: usize) -> [f64; D] {
        match &self.nodes[node_id].entries {
            NodeEntries::Points(points) => points[entry],
            NodeEntries::Children(_) => unreachable!("neighbor candidates are collected at leaves"),
        }
    }

    // Slot ids are positional: the arena only ever grows, so a node's index
    // identifies it for the lifetime of the tree.
    fn add_slot(&mut self, node: Node<D>) -> usize {
        let slot_id = self.nodes.len();
        self.nodes.push(node);
        slot_id
    }
}

impl<const D: usize> Default for Srindex<D> {
    fn default() -> Self {
        Srindex::new(15).expect("Invalid branching factor")
    }
}
