use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::Bindable;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Bindable)]
#[bind(compact = "customCourse", positional(delimiter = "|"))]
pub struct Course {
    #[bind(validate(length(min = 1, max = 200)))]
    pub name: String,
    pub start_date: NaiveDate,
}
