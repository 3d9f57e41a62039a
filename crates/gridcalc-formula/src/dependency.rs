use std::collections::{HashMap, HashSet, VecDeque};

use gridcalc_core::{CellCoord, CellError};

/// Directed dependency graph between cells.
///
/// The spreadsheet owns one of these and propagates recomputation as an
/// explicit graph walk after each edit; cells never notify each other
/// directly. Both directions are kept: what a cell reads (its formula
/// inputs) and the reverse (who reads it).
#[derive(Debug, Default)]
pub struct DependencyGraph {
    /// cell -> cells its formula reads
    dependencies: HashMap<CellCoord, HashSet<CellCoord>>,
    /// cell -> cells whose formulas read it
    dependents: HashMap<CellCoord, HashSet<CellCoord>>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace a cell's dependency set after its formula changed.
    ///
    /// Stale reverse edges are removed before the new ones are added, so
    /// re-registration is idempotent and never double-subscribes.
    pub fn set_dependencies(&mut self, cell: CellCoord, deps: HashSet<CellCoord>) {
        if let Some(old_deps) = self.dependencies.get(&cell) {
            for dep in old_deps {
                if let Some(dependents) = self.dependents.get_mut(dep) {
                    dependents.remove(&cell);
                    if dependents.is_empty() {
                        self.dependents.remove(dep);
                    }
                }
            }
        }

        for dep in &deps {
            self.dependents.entry(*dep).or_default().insert(cell);
        }

        if deps.is_empty() {
            self.dependencies.remove(&cell);
        } else {
            self.dependencies.insert(cell, deps);
        }
    }

    /// Drop all subscriptions a cell holds (when it stops being a formula)
    pub fn remove_cell(&mut self, cell: CellCoord) {
        self.set_dependencies(cell, HashSet::new());
    }

    /// Cells whose formulas directly read the given cell
    pub fn dependents_of(&self, cell: CellCoord) -> Option<&HashSet<CellCoord>> {
        self.dependents.get(&cell)
    }

    /// Cells the given cell's formula directly reads
    pub fn dependencies_of(&self, cell: CellCoord) -> Option<&HashSet<CellCoord>> {
        self.dependencies.get(&cell)
    }

    /// Every cell that must recompute when `changed` changes, in
    /// topological order (dependencies before dependents, `changed` first).
    ///
    /// A cycle inside the affected set is reported instead of walked
    /// forever.
    pub fn recalc_order(&self, changed: CellCoord) -> Result<Vec<CellCoord>, CellError> {
        // Collect the affected set with a BFS over reverse edges
        let mut affected = HashSet::new();
        let mut queue = VecDeque::new();
        queue.push_back(changed);

        while let Some(cell) = queue.pop_front() {
            if !affected.insert(cell) {
                continue;
            }
            if let Some(dependents) = self.dependents_of(cell) {
                for dependent in dependents {
                    queue.push_back(*dependent);
                }
            }
        }

        // Topologically sort it
        let mut order = Vec::with_capacity(affected.len());
        let mut visited = HashSet::new();
        let mut in_progress = HashSet::new();

        for cell in &affected {
            if !visited.contains(cell) {
                self.visit(*cell, &affected, &mut order, &mut visited, &mut in_progress)?;
            }
        }

        Ok(order)
    }

    fn visit(
        &self,
        cell: CellCoord,
        affected: &HashSet<CellCoord>,
        order: &mut Vec<CellCoord>,
        visited: &mut HashSet<CellCoord>,
        in_progress: &mut HashSet<CellCoord>,
    ) -> Result<(), CellError> {
        if in_progress.contains(&cell) {
            return Err(CellError::CircularReference);
        }
        if visited.contains(&cell) {
            return Ok(());
        }

        in_progress.insert(cell);

        if let Some(deps) = self.dependencies_of(cell) {
            for dep in deps {
                if affected.contains(dep) {
                    self.visit(*dep, affected, order, visited, in_progress)?;
                }
            }
        }

        in_progress.remove(&cell);
        visited.insert(cell);
        order.push(cell);

        Ok(())
    }

    /// Whether making `cell` depend on `new_dep` would close a cycle, i.e.
    /// whether `new_dep` already depends on `cell` transitively.
    pub fn would_create_cycle(&self, cell: CellCoord, new_dep: CellCoord) -> bool {
        let mut visited = HashSet::new();
        let mut queue = VecDeque::new();
        queue.push_back(new_dep);

        while let Some(current) = queue.pop_front() {
            if current == cell {
                return true;
            }
            if !visited.insert(current) {
                continue;
            }
            if let Some(deps) = self.dependencies_of(current) {
                for dep in deps {
                    queue.push_back(*dep);
                }
            }
        }

        false
    }

    pub fn clear(&mut self) {
        self.dependencies.clear();
        self.dependents.clear();
    }
}
