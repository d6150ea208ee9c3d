/// Published by the history manager after each state change.
///
/// Views hold the receiving end and redraw when they next get the chance, so
/// a refresh may lag the change that caused it.
#[derive(Debug, Clone, PartialEq)]
pub enum HistoryEvent {
    Recorded { description: String },
    Undone { description: String },
    Redone { description: String },
    Cleared,
}
