mod dashboard;

pub use dashboard::DealerPerformanceDashboard;
