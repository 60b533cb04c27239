use crate::domain::model::{PreferenceValue, TypeTag};

pub fn classify(value: Option<&PreferenceValue>) -> TypeTag {
    match value {
        None => TypeTag::Null,
        Some(PreferenceValue::Boolean(_)) => TypeTag::Boolean,
        Some(PreferenceValue::Integer(_)) => TypeTag::Integer,
        Some(PreferenceValue::Real(_)) => TypeTag::Real,
        Some(PreferenceValue::String(_)) => TypeTag::String,
        Some(PreferenceValue::Data(_)) => TypeTag::Data,
        Some(PreferenceValue::Date(_)) => TypeTag::Date,
        Some(PreferenceValue::Array(_)) => TypeTag::Array,
        Some(PreferenceValue::Dictionary(_)) => TypeTag::Dictionary,
        Some(PreferenceValue::Unknown { .. }) => TypeTag::Unknown,
    }
}
