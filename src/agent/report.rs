//! Learning-curve report
//!
//! Two-column table of (episodes played, block-average cumulative
//! per-unit reward), printed in increasing episode order after every
//! evaluation block and once more at shutdown.

use crate::agent::phase::BlockSummary;

/// Render the learning curve as a printable table
pub fn render_learning_curve(curve: &[BlockSummary]) -> String {
    let mut out = String::new();
    out.push('\n');
    out.push_str("Games Played      Average Cumulative Reward\n");
    out.push_str("-------------     -------------------------\n");
    for block in curve {
        out.push_str(&format!(
            "{:<18}{:.2}\n",
            block.episodes_played, block.average_reward
        ));
    }
    out
}

pub fn print_learning_curve(curve: &[BlockSummary]) {
    print!("{}", render_learning_curve(curve));
}
