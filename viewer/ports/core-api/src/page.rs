use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use domain_model::Instrument;

use crate::ChartError;

/// Everything the HTML page needs; no presentation logic lives here.
#[derive(Debug, Clone)]
pub struct ChartPage {
    pub instrument: Instrument,
    pub data_source: String,
    pub start_date: String,
    pub end_date: String,
    pub state: PageState,
}

#[derive(Debug, Clone)]
pub enum PageState {
    AwaitingInput,
    Rendered(ChartImage),
    Error(ChartError),
}

impl ChartPage {
    pub fn image(&self) -> Option<&ChartImage> {
        match &self.state {
            PageState::Rendered(image) => Some(image),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&ChartError> {
        match &self.state {
            PageState::Error(err) => Some(err),
            _ => None,
        }
    }
}

/// PNG encoded chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartImage {
    png: Vec<u8>,
}

impl ChartImage {
    pub fn new(png: Vec<u8>) -> Self {
        Self { png }
    }

    pub fn png(&self) -> &[u8] {
        &self.png
    }

    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.png)
    }

    pub fn data_uri(&self) -> String {
        format!("data:image/png;base64,{}", self.to_base64())
    }
}
