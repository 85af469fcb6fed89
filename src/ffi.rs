//! C ABI for agents that run their own detector and matcher
//!
//! The request and response are JSON strings. Strings returned by this
//! module must be released with [`locator_free_string`].

use serde::{Deserialize, Serialize};
use std::ffi::{CStr, CString};
use std::os::raw::c_char;

use crate::config::LocatorConfig;
use crate::error::Result;
use crate::matching::{choose_coordinate_with, Correspondence, CorrespondenceFilter, Point};

/// Input of [`select`]
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectRequest {
    pub correspondences: Vec<Correspondence>,
    #[serde(default)]
    pub assist: Option<Point>,
    #[serde(default)]
    pub config: Option<LocatorConfig>,
}

/// Output of [`select`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectResponse {
    pub accepted_count: usize,
    pub found: bool,
    pub x: Option<u32>,
    pub y: Option<u32>,
}

/// Filter correspondences and choose a coordinate, without any image I/O
pub fn select(request: &SelectRequest) -> Result<SelectResponse> {
    let config = request.config.clone().unwrap_or_default();
    config.validate()?;
    let filter = CorrespondenceFilter::from_config(&config)?;
    let filtered = filter.filter(&request.correspondences)?;

    let chosen = if filtered.is_reliable() {
        choose_coordinate_with(filtered.candidate_points(), request.assist, config.aggregation)
    } else {
        None
    };

    Ok(SelectResponse {
        accepted_count: filtered.accepted_count(),
        found: chosen.is_some(),
        x: chosen.map(|p| p.x),
        y: chosen.map(|p| p.y),
    })
}

/// JSON in, JSON out. Errors come back as `{"error": "..."}`.
pub fn select_json(request_json: &str) -> String {
    let response = serde_json::from_str::<SelectRequest>(request_json)
        .map_err(Into::into)
        .and_then(|request| select(&request))
        .and_then(|response| serde_json::to_string(&response).map_err(Into::into));

    match response {
        Ok(json) => json,
        Err(e) => {
            log::warn!("Selection request failed: {}", e);
            serde_json::json!({ "error": e.to_string() }).to_string()
        }
    }
}

fn into_c_string(s: String) -> *mut c_char {
    CString::new(s)
        .map(CString::into_raw)
        .unwrap_or(std::ptr::null_mut())
}

/// Run a selection request.
/// Caller must free the returned string with locator_free_string
#[no_mangle]
pub extern "C" fn locator_select(request_json: *const c_char) -> *mut c_char {
    if request_json.is_null() {
        return into_c_string(serde_json::json!({ "error": "Null pointer passed" }).to_string());
    }

    let request = unsafe { CStr::from_ptr(request_json).to_string_lossy() };
    into_c_string(select_json(&request))
}

/// Free a string returned by this library
#[no_mangle]
pub extern "C" fn locator_free_string(s: *mut c_char) {
    if !s.is_null() {
        unsafe {
            let _ = CString::from_raw(s);
        }
    }
}

/// Get library version
#[no_mangle]
pub extern "C" fn locator_version() -> *const c_char {
    static VERSION: &[u8] = concat!(env!("CARGO_PKG_VERSION"), "\0").as_bytes();
    VERSION.as_ptr() as *const c_char
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(count: u32, assist: Option<Point>) -> SelectRequest {
        SelectRequest {
            correspondences: (0..count)
                .map(|i| Correspondence::new(Point::new(10 + i, 20 + i), 1.0, Some(10.0)))
                .collect(),
            assist,
            config: None,
        }
    }

    #[test]
    fn test_select_found() {
        let response = select(&request(5, None)).unwrap();
        assert_eq!(
            response,
            SelectResponse {
                accepted_count: 5,
                found: true,
                x: Some(12),
                y: Some(22),
            }
        );
    }

    #[test]
    fn test_select_not_enough_matches() {
        let response = select(&request(3, None)).unwrap();
        assert_eq!(response.accepted_count, 3);
        assert!(!response.found);
        assert!(response.x.is_none());
    }

    #[test]
    fn test_select_with_assist() {
        let response = select(&request(6, Some(Point::new(0, 23)))).unwrap();
        assert_eq!((response.x, response.y), (Some(13), Some(23)));
    }

    #[test]
    fn test_select_json_roundtrip() {
        let json = r#"{
            "correspondences": [
                {"sourcePoint": {"x": 1, "y": 1}, "bestDistance": 1.0, "secondBestDistance": 10.0},
                {"sourcePoint": {"x": 2, "y": 2}, "bestDistance": 1.0, "secondBestDistance": 10.0},
                {"sourcePoint": {"x": 9, "y": 9}, "bestDistance": 1.0}
            ],
            "config": {"min_matches": 1}
        }"#;

        let value: serde_json::Value = serde_json::from_str(&select_json(json)).unwrap();
        assert_eq!(value["acceptedCount"], 2);
        assert_eq!(value["found"], true);
        assert_eq!(value["x"], 1);
        assert_eq!(value["y"], 1);
    }

    #[test]
    fn test_select_json_error() {
        let value: serde_json::Value = serde_json::from_str(&select_json("not json")).unwrap();
        assert!(value["error"].as_str().unwrap().contains("invalid request"));
    }

    #[test]
    fn test_select_json_invalid_distance() {
        let json = r#"{"correspondences": [{"sourcePoint": {"x": 1, "y": 1}, "bestDistance": -2.0}]}"#;
        let value: serde_json::Value = serde_json::from_str(&select_json(json)).unwrap();
        assert!(value["error"].as_str().unwrap().contains("invalid distance"));
    }

    #[test]
    fn test_ffi_roundtrip() {
        let input = CString::new(r#"{"correspondences": []}"#).unwrap();
        let out = locator_select(input.as_ptr());
        assert!(!out.is_null());

        let text = unsafe { CStr::from_ptr(out).to_string_lossy().into_owned() };
        locator_free_string(out);
        assert!(text.contains("\"found\":false"));
    }

    #[test]
    fn test_ffi_null_request() {
        let out = locator_select(std::ptr::null());
        let text = unsafe { CStr::from_ptr(out).to_string_lossy().into_owned() };
        locator_free_string(out);
        assert!(text.contains("Null pointer"));
    }

    #[test]
    fn test_version() {
        let version = unsafe { CStr::from_ptr(locator_version()) };
        assert_eq!(version.to_str().unwrap(), env!("CARGO_PKG_VERSION"));
    }
}
