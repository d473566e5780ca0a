//! Value types shared by the collection pipeline.
mod metric;
mod query;
mod window;


pub use metric::{Dimension, DimensionFilter, MetricIdentity, StatisticKind};
pub use query::{Datapoint, QueryDescriptor, ResultRecord, ResultStatus, Snapshot};
pub use window::TimeWindow;
