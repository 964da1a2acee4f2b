pub mod d400_overview;
pub mod d401_dealer_performance;
