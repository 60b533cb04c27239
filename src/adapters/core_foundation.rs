//! CoreFoundation preferences backend (macOS only).

use crate::domain::model::{HostScope, PreferenceValue, UserScope};
use crate::domain::ports::PreferenceStore;
use crate::utils::error::Result;
use chrono::{DateTime, Utc};
use core_foundation::array::{CFArray, CFArrayRef};
use core_foundation::base::{CFType, CFTypeRef, TCFType};
use core_foundation::boolean::CFBoolean;
use core_foundation::data::CFData;
use core_foundation::date::CFDate;
use core_foundation::dictionary::{CFDictionary, CFDictionaryRef};
use core_foundation::number::CFNumber;
use core_foundation::string::{CFString, CFStringRef};
use core_foundation_sys::base::{CFCopyDescription, CFCopyTypeIDDescription};
use core_foundation_sys::number::CFNumberIsFloatType;
use core_foundation_sys::preferences::{
    kCFPreferencesAnyHost, kCFPreferencesAnyUser, kCFPreferencesCurrentHost,
    kCFPreferencesCurrentUser, CFPreferencesAppValueIsForced, CFPreferencesCopyAppValue,
    CFPreferencesCopyValue,
};
use std::collections::BTreeMap;

/// Seconds between the Unix epoch and 2001-01-01T00:00:00Z.
const CF_ABSOLUTE_TIME_EPOCH: f64 = 978_307_200.0;

#[derive(Debug, Clone, Copy, Default)]
pub struct CoreFoundationStore;

impl CoreFoundationStore {
    pub fn new() -> Self {
        Self
    }
}

impl PreferenceStore for CoreFoundationStore {
    fn copy_app_value(&self, domain: &str, key: &str) -> Result<Option<PreferenceValue>> {
        let key = CFString::new(key);
        let app = CFString::new(domain);
        let raw = unsafe { CFPreferencesCopyAppValue(key.as_concrete_TypeRef(), app.as_concrete_TypeRef()) };
        Ok(take_value(raw))
    }

    fn is_forced(&self, domain: &str, key: &str) -> Result<bool> {
        let key = CFString::new(key);
        let app = CFString::new(domain);
        let forced =
            unsafe { CFPreferencesAppValueIsForced(key.as_concrete_TypeRef(), app.as_concrete_TypeRef()) };
        Ok(forced != 0)
    }

    fn copy_value(
        &self,
        domain: &str,
        key: &str,
        user: UserScope,
        host: HostScope,
    ) -> Result<Option<PreferenceValue>> {
        let key = CFString::new(key);
        let app = CFString::new(domain);
        let raw = unsafe {
            CFPreferencesCopyValue(
                key.as_concrete_TypeRef(),
                app.as_concrete_TypeRef(),
                user_ref(user),
                host_ref(host),
            )
        };
        Ok(take_value(raw))
    }
}

fn user_ref(user: UserScope) -> CFStringRef {
    unsafe {
        match user {
            UserScope::Current => kCFPreferencesCurrentUser,
            UserScope::Any => kCFPreferencesAnyUser,
        }
    }
}

fn host_ref(host: HostScope) -> CFStringRef {
    unsafe {
        match host {
            HostScope::Current => kCFPreferencesCurrentHost,
            HostScope::Any => kCFPreferencesAnyHost,
        }
    }
}

/// Takes ownership of a value returned by a Copy function.
fn take_value(raw: CFTypeRef) -> Option<PreferenceValue> {
    if raw.is_null() {
        return None;
    }
    let value = unsafe { CFType::wrap_under_create_rule(raw) };
    Some(convert(&value))
}

fn convert(value: &CFType) -> PreferenceValue {
    // CFBoolean is checked before CFNumber; they are distinct CF types.
    if let Some(b) = value.downcast::<CFBoolean>() {
        return PreferenceValue::Boolean(b.into());
    }
    if let Some(n) = value.downcast::<CFNumber>() {
        let is_float = unsafe { CFNumberIsFloatType(n.as_concrete_TypeRef()) } != 0;
        return if is_float {
            n.to_f64()
                .map(PreferenceValue::Real)
                .unwrap_or_else(|| unknown(value))
        } else {
            n.to_i64()
                .map(PreferenceValue::Integer)
                .unwrap_or_else(|| unknown(value))
        };
    }
    if let Some(s) = value.downcast::<CFString>() {
        return PreferenceValue::String(s.to_string());
    }
    if let Some(d) = value.downcast::<CFData>() {
        return PreferenceValue::Data(d.bytes().to_vec());
    }
    if let Some(date) = value.downcast::<CFDate>() {
        return date_from_absolute_time(date.abs_time())
            .map(PreferenceValue::Date)
            .unwrap_or_else(|| unknown(value));
    }
    if value.type_of() == CFArray::<CFType>::type_id() {
        let array: CFArray<CFType> =
            unsafe { CFArray::wrap_under_get_rule(value.as_CFTypeRef() as CFArrayRef) };
        return PreferenceValue::Array(array.iter().map(|item| convert(&item)).collect());
    }
    if value.type_of() == CFDictionary::<CFType, CFType>::type_id() {
        let dict: CFDictionary =
            unsafe { CFDictionary::wrap_under_get_rule(value.as_CFTypeRef() as CFDictionaryRef) };
        let (keys, values) = dict.get_keys_and_values();
        let mut map = BTreeMap::new();
        for (k, v) in keys.into_iter().zip(values) {
            let k = unsafe { CFType::wrap_under_get_rule(k as CFTypeRef) };
            let v = unsafe { CFType::wrap_under_get_rule(v as CFTypeRef) };
            let name = match k.downcast::<CFString>() {
                Some(s) => s.to_string(),
                None => format!("{:?}", k),
            };
            map.insert(name, convert(&v));
        }
        return PreferenceValue::Dictionary(map);
    }
    unknown(value)
}

fn unknown(value: &CFType) -> PreferenceValue {
    let type_name =
        unsafe { CFString::wrap_under_create_rule(CFCopyTypeIDDescription(value.type_of())) };
    let description = unsafe { CFString::wrap_under_create_rule(CFCopyDescription(value.as_CFTypeRef())) };
    PreferenceValue::Unknown {
        type_name: type_name.to_string(),
        description: description.to_string(),
    }
}

fn date_from_absolute_time(abs: f64) -> Option<DateTime<Utc>> {
    let unix = abs + CF_ABSOLUTE_TIME_EPOCH;
    let secs = unix.floor();
    let nanos = ((unix - secs) * 1e9).round().min(999_999_999.0) as u32;
    DateTime::from_timestamp(secs as i64, nanos)
}
