//! A small column-aligned table printer, used to dump the NFA/DFA transition tables for
//! `-v/--verbose` diagnostics. Unlike a parser input, here every cell is computed (state ids,
//! formatted transitions), so cells are owned `String`s rather than borrowed `&str`.

use std::cmp::max;

#[derive(Default, Debug, Clone)]
pub struct Table {
    row_len: Vec<usize>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn push_row(&mut self, row: Vec<String>) {
        if row.len() > self.row_len.len() {
            self.row_len.resize(row.len(), 0);
        }
        self.row_len
            .iter_mut()
            .zip(&row)
            .for_each(|(max_len, s)| *max_len = max(*max_len, s.chars().count()));
        self.rows.push(row);
    }

    pub fn to_string(&self, sep: &str) -> String {
        let pad = |s: &str, l: usize| {
            let cs = s.chars().count();
            if cs < l {
                format!("{}{}", s, " ".repeat(l - cs))
            } else {
                s.to_string()
            }
        };
        self.rows
            .iter()
            .map(|row| {
                row.iter()
                    .zip(&self.row_len)
                    .map(|(s, &l)| format!("{}{sep}", pad(s, l)))
                    .collect::<Vec<_>>()
                    .join("")
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Renders a completed or minimized DFA's transition table: one header row for the alphabet
/// (with `Σ` last), then one row per state marking the initial state with `->` and accepting
/// states with `*`.
pub fn dfa_table(dfa: &crate::dfa::Dfa) -> String {
    let mut alphabet: Vec<char> = dfa
        .states
        .iter()
        .flat_map(|s| s.transitions.keys().copied())
        .collect();
    alphabet.sort_unstable();
    alphabet.dedup();

    let mut table = Table::default();
    let mut header = vec![String::new(), String::new(), String::new()];
    header.extend(alphabet.iter().map(|c| c.to_string()));
    header.push("Σ".to_string());
    table.push_row(header);

    for (id, state) in dfa.states.iter().enumerate() {
        let mut row = vec![
            if id == dfa.initial_state { "->".to_string() } else { String::new() },
            if state.accepting { "*".to_string() } else { String::new() },
            id.to_string(),
        ];
        for &c in &alphabet {
            row.push(
                state
                    .transitions
                    .get(&c)
                    .map(|t| t.to_string())
                    .unwrap_or_default(),
            );
        }
        row.push(state.default.map(|t| t.to_string()).unwrap_or_default());
        table.push_row(row);
    }

    table.to_string(" ")
}
