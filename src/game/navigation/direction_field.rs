use crate::game::lattice::{CellId, Compass, Lattice};

/// Points every cell at its lowest-cost neighbour.
///
/// The search starts from the cell's own `best_cost` and only accepts a
/// strictly smaller neighbour, so the goal and unreachable pockets get no
/// direction. An impassable cell bordering the reached region still points
/// back into it, which lets an agent standing on one walk off. Among equal candidates the first one in
/// [`Compass::SCAN_ORDER`] wins. Returns the number of cells with a direction.
pub fn generate(lattice: &mut Lattice) -> usize {
    let mut directed = 0;
    for id in 0..lattice.len() {
        let direction = steepest_descent(lattice, id);
        if direction.is_some() {
            directed += 1;
        }
        if let Some(cell) = lattice.cell_mut(id) {
            cell.direction = direction;
        }
    }
    directed
}

fn steepest_descent(lattice: &Lattice, id: CellId) -> Option<Compass> {
    let cell = lattice.cell(id)?;
    let origin = cell.coord().as_ivec2();
    let mut best_cost = cell.best_cost();
    let mut best = None;

    for (_, neighbor_id) in lattice.neighbors(id) {
        let Some(neighbor) = lattice.cell(neighbor_id) else { continue };
        if neighbor.best_cost() < best_cost {
            best_cost = neighbor.best_cost();
            best = Compass::from_offset(neighbor.coord().as_ivec2() - origin);
        }
    }
    best
}
