mod filter_picker;
mod key_result;

pub use filter_picker::{FilterPicker, FilterPickerEvent};
pub use key_result::KeyResult;
