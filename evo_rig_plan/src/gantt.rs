//! ASCII Gantt renderer.
//!
//! Renders a solved [`Schedule`] as one occupancy row and one state row
//! per DOF, spanning `zoom * makespan` columns, with stage-boundary
//! separators and a legend.

use std::fmt::Write as _;

use crate::catalogue::Catalogue;
use crate::dof::Dof;
use crate::schedule::Schedule;
use crate::task::OpType;

/// Render `schedule` at the given `zoom` factor (columns per second),
/// with a `|` inserted at each offset in `stage_cuts`.
pub fn render(catalogue: &Catalogue, schedule: &Schedule, zoom: u32, stage_cuts: &[u32]) -> String {
    let zoom = zoom.max(1);
    let width = (schedule.makespan() * zoom) as usize;
    let cuts: std::collections::HashSet<usize> = stage_cuts.iter().map(|&t| (t * zoom) as usize).collect();

    let mut out = String::new();
    for dof in Dof::ALL {
        let mut occupancy = vec!['.'; width];
        let mut state = vec![' '; width];

        for id in catalogue.ids_for_dof(dof) {
            let task = catalogue.task(id);
            let interval = schedule.interval(id);
            let lo = (interval.start * zoom) as usize;
            let hi = (interval.end * zoom) as usize;
            if lo == hi {
                continue;
            }
            for col in lo..hi {
                occupancy[col] = 'X';
            }
            let body_glyph = match task.op_type {
                OpType::Move => '#',
                OpType::Spin | OpType::Hold => task.mid_state.glyph(),
            };
            for col in state.iter_mut().take(hi).skip(lo) {
                *col = body_glyph;
            }
            state[lo] = task.start_state.glyph();
            state[hi - 1] = task.end_state.glyph();
        }

        writeln!(out, "{:>3} |{}", dof.name(), insert_cuts(&occupancy, &cuts)).unwrap();
        writeln!(out, "    |{}", insert_cuts(&state, &cuts)).unwrap();
    }

    out.push('\n');
    out.push_str("Legend: X=occupied  .=idle  |=stage cut  #=in transit\n");
    for dof in Dof::ALL {
        writeln!(out, "  {:>3} = {}", dof.name(), dof_description(dof)).unwrap();
    }

    out
}

fn insert_cuts(row: &[char], cuts: &std::collections::HashSet<usize>) -> String {
    let mut s = String::with_capacity(row.len() + cuts.len());
    for (i, c) in row.iter().enumerate() {
        if cuts.contains(&i) {
            s.push('|');
        }
        s.push(*c);
    }
    s
}

fn dof_description(dof: Dof) -> &'static str {
    match dof {
        Dof::Fz => "feed axis",
        Dof::Sr => "pipe carousel",
        Dof::Me => "manipulator arm",
        Dof::Mg => "manipulator gripper",
        Dof::Mr => "manipulator arm (assist)",
        Dof::Dh => "upper clamp",
        Dof::Pr => "power head spin",
        Dof::Cb => "lower clamp",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine;

    #[test]
    fn render_produces_one_row_pair_per_dof() {
        let mut cat = Catalogue::default();
        cat.add_move("A", Dof::Fz, 5, 'A', 'H').unwrap();
        let schedule = engine::solve(&cat).unwrap();

        let chart = render(&cat, &schedule, 1, &[]);
        assert_eq!(chart.lines().filter(|l| l.contains("Fz")).count(), 1);
    }

    #[test]
    fn zoom_multiplies_column_count() {
        let mut cat = Catalogue::default();
        cat.add_move("A", Dof::Fz, 4, 'A', 'H').unwrap();
        let schedule = engine::solve(&cat).unwrap();

        let at_1 = render(&cat, &schedule, 1, &[]);
        let at_2 = render(&cat, &schedule, 2, &[]);
        let row_1 = at_1.lines().find(|l| l.starts_with("    |")).unwrap();
        let row_2 = at_2.lines().find(|l| l.starts_with("    |")).unwrap();
        assert_eq!(row_2.len() - "    |".len(), (row_1.len() - "    |".len()) * 2);
    }
}
