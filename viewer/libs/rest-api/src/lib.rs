pub mod endpoints {
    pub const INDEX: &str = "/";
}

pub mod forms {
    use serde::{Deserialize, Serialize};

    /// Submitted date range. `start`/`end` are accepted as short names,
    /// `start_date`/`end_date` win when both are sent.
    #[derive(Debug, Default, Deserialize, Serialize)]
    pub struct DateRangeForm {
        pub start_date: Option<String>,
        pub end_date: Option<String>,
        pub start: Option<String>,
        pub end: Option<String>,
    }

    impl DateRangeForm {
        /// Both dates, if both were submitted and are not blank.
        pub fn dates(&self) -> Option<(&str, &str)> {
            let start = non_blank(&self.start_date).or_else(|| non_blank(&self.start))?;
            let end = non_blank(&self.end_date).or_else(|| non_blank(&self.end))?;
            Some((start, end))
        }
    }

    fn non_blank(value: &Option<String>) -> Option<&str> {
        value.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }

}
