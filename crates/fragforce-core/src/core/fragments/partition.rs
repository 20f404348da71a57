use crate::core::models::topology::BondGraph;

/// Splits the bond graph into its connected components.
///
/// Each component is returned as an ascending list of atom indices; components are ordered
/// by their smallest member. The traversal uses an explicit stack and a visited mask, so
/// rings and very large molecules are handled without recursion.
pub fn connected_components(graph: &BondGraph) -> Vec<Vec<usize>> {
    let atom_count = graph.atom_count();
    let mut visited = vec![false; atom_count];
    let mut components = Vec::new();
    let mut stack = Vec::new();

    for start in 0..atom_count {
        if visited[start] {
            continue;
        }
        visited[start] = true;
        stack.push(start);

        let mut component = Vec::new();
        while let Some(atom) = stack.pop() {
            component.push(atom);
            for neighbor in graph.neighbors(atom) {
                if !visited[neighbor] {
                    visited[neighbor] = true;
                    stack.push(neighbor);
                }
            }
        }
        component.sort_unstable();
        components.push(component);
    }

    components
}
