/// A successfully applied move, recorded with everything undo needs: the
/// resolved container indices, the card count for sequence moves, and
/// whether the move turned a new source top face up.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Action {
    Draw,
    /// The exhausted stock was turned back over from the reversed waste.
    Redeal,
    WasteToFoundation(usize),
    WasteToTableau(usize),
    TableauToFoundation {
        tableau: usize,
        foundation: usize,
        flipped: bool,
    },
    TableauToTableau {
        from: usize,
        to: usize,
        count: usize,
        flipped: bool,
    },
    FoundationToTableau {
        foundation: usize,
        tableau: usize,
    },
}

impl Action {
    pub fn is_redeal(&self) -> bool {
        matches!(self, Action::Redeal)
    }
}

/// Renders an action log in compact notation: `D` draws (consecutive draws
/// collapse to `3D`), `R` redeals, and `W:F1` / `T2:T5@3` style transfers,
/// ten to a row.
pub fn format_actions(actions: &[Action]) -> String {
    let mut list = Vec::new();
    let mut i = 0;
    while i < actions.len() {
        match actions[i] {
            Action::Draw => {
                let mut count = 1;
                while i + count < actions.len() && matches!(actions[i + count], Action::Draw) {
                    count += 1;
                }
                list.push(if count == 1 {
                    "D".to_string()
                } else {
                    format!("{count}D")
                });
                i += count;
                continue;
            }
            Action::Redeal => list.push("R".to_string()),
            Action::WasteToFoundation(idx) => list.push(format!("W:F{}", idx + 1)),
            Action::WasteToTableau(idx) => list.push(format!("W:T{}", idx + 1)),
            Action::TableauToFoundation {
                tableau, foundation, ..
            } => {
                list.push(format!("T{}:F{}", tableau + 1, foundation + 1));
            }
            Action::TableauToTableau {
                from, to, count, ..
            } => {
                let mut s = format!("T{}:T{}", from + 1, to + 1);
                if count > 1 {
                    s.push_str(&format!("@{count}"));
                }
                list.push(s);
            }
            Action::FoundationToTableau {
                foundation, tableau,
            } => {
                list.push(format!("F{}:T{}", foundation + 1, tableau + 1));
            }
        }
        i += 1;
    }

    let width = list.iter().map(|s| s.len()).max().unwrap_or_default() + 1;
    let mut output = String::new();
    for chunk in list.chunks(10) {
        let line: String = chunk.iter().map(|cmd| format!("{cmd:<width$}")).collect();
        output.push_str(line.trim_end());
        output.push('\n');
    }
    output
}
