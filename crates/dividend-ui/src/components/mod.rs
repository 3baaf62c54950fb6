//! Small line-oriented widgets shared by the dashboard and table views.

pub mod header;
pub mod share_bar;
pub mod stat_cards;
