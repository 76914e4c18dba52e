use async_trait::async_trait;
use bookwise_core::{
    admission::{BusyIntervalSource, ResourceScope},
    time::TimeInterval,
};
use chrono::NaiveDate;
use mockall::mock;

// Mock busy-interval store for testing
mock! {
    pub BusyIntervals {}

    #[async_trait]
    impl BusyIntervalSource for BusyIntervals {
        async fn busy_intervals(
            &self,
            scope: &ResourceScope,
            date: NaiveDate,
        ) -> eyre::Result<Vec<TimeInterval>>;
    }
}
