use itinerary_api_types::{Stop, StopId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopImage {
    Url(String),
    Placeholder,
}

/// Contents of the stop detail dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StopDetail {
    pub stop_id: StopId,
    pub title: String,
    pub description: String,
    pub day_badge: String,
    pub image: StopImage,
}

impl StopDetail {
    pub fn new(stop: &Stop, image_base_path: &str) -> Self {
        let image = match stop.image_filename.as_deref() {
            Some(filename) if !filename.is_empty() => StopImage::Url(format!(
                "{}/{filename}",
                image_base_path.trim_end_matches('/')
            )),
            _ => StopImage::Placeholder,
        };

        Self {
            stop_id: stop.id,
            title: stop.name.clone(),
            description: stop
                .readable_description()
                .unwrap_or("No description available.")
                .to_owned(),
            day_badge: format!("Day {}", stop.day_number),
            image,
        }
    }
}
