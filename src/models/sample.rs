use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// One fully-computed probe sample, built fresh each tick and discarded after
/// it is emitted.
///
/// The encoded form is the wire contract the supervising process parses:
/// field names, declaration order, and the `0/1` encoding of `audio_playing`
/// must not change.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActivitySample {
    /// Seconds since the last global user input; 0.0 when the OS had nothing.
    pub idle_time: f64,
    /// Foreground window title, truncated at capture to 255 characters.
    pub window_title: String,
    /// Whether any audio session on the default render endpoint was active.
    #[serde(serialize_with = "bool_as_int", deserialize_with = "int_as_bool")]
    pub audio_playing: bool,
    /// Process id owning the foreground window; 0 when unresolved.
    pub pid: u32,
    /// Lower-cased executable base name; empty when the lookup was denied.
    pub process_name: String,
}

impl ActivitySample {
    /// Serializes the sample as a single JSON line without a terminator.
    pub fn encode(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

fn bool_as_int<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u8(u8::from(*value))
}

fn int_as_bool<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    match u8::deserialize(deserializer)? {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(serde::de::Error::custom(format!(
            "audio_playing must be 0 or 1, got {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_reference_sample_exactly() {
        let sample = ActivitySample {
            idle_time: 5.25,
            window_title: "Notes — \"draft\"".to_string(),
            audio_playing: true,
            pid: 4321,
            process_name: "notes.exe".to_string(),
        };

        assert_eq!(
            sample.encode().unwrap(),
            "{\"idle_time\":5.25,\"window_title\":\"Notes — \\\"draft\\\"\",\
             \"audio_playing\":1,\"pid\":4321,\"process_name\":\"notes.exe\"}"
        );
    }

    #[test]
    fn default_sample_keeps_every_field() {
        assert_eq!(
            ActivitySample::default().encode().unwrap(),
            r#"{"idle_time":0.0,"window_title":"","audio_playing":0,"pid":0,"process_name":""}"#
        );
    }

    #[test]
    fn escapes_quotes_backslashes_and_control_characters() {
        let sample = ActivitySample {
            window_title: "a\"b\\c\nd\re\tf".to_string(),
            ..ActivitySample::default()
        };
        let line = sample.encode().unwrap();

        assert!(line.contains(r#"a\"b\\c\nd\re\tf"#));
        let value: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(value["window_title"], "a\"b\\c\nd\re\tf");
    }

    #[test]
    fn plain_text_passes_through_unchanged() {
        let sample = ActivitySample {
            window_title: "Cargo.toml - Visual Studio Code".to_string(),
            ..ActivitySample::default()
        };
        assert!(sample
            .encode()
            .unwrap()
            .contains(r#""window_title":"Cargo.toml - Visual Studio Code""#));
    }

    #[test]
    fn encoded_record_is_one_line_with_fixed_key_order() {
        let sample = ActivitySample {
            idle_time: 1.5,
            window_title: "title".to_string(),
            audio_playing: false,
            pid: 7,
            process_name: "app.exe".to_string(),
        };
        let line = sample.encode().unwrap();

        assert!(!line.contains('\n'));
        let positions: Vec<usize> = [
            "\"idle_time\"",
            "\"window_title\"",
            "\"audio_playing\"",
            "\"pid\"",
            "\"process_name\"",
        ]
        .iter()
        .map(|key| line.find(key).unwrap())
        .collect();
        assert!(positions.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn round_trips_through_json() {
        let sample = ActivitySample {
            idle_time: 12.75,
            window_title: "Notes\t\"quoted\"".to_string(),
            audio_playing: true,
            pid: 998,
            process_name: "notes.exe".to_string(),
        };
        let decoded: ActivitySample =
            serde_json::from_str(&sample.encode().unwrap()).unwrap();
        assert_eq!(decoded, sample);
    }

    #[test]
    fn rejects_audio_flag_outside_zero_or_one() {
        let err = serde_json::from_str::<ActivitySample>(
            r#"{"idle_time":0.0,"window_title":"","audio_playing":2,"pid":0,"process_name":""}"#,
        );
        assert!(err.is_err());
    }

    #[test]
    fn title_at_capture_bound_encodes_cleanly() {
        let sample = ActivitySample {
            window_title: "x".repeat(255),
            ..ActivitySample::default()
        };
        let line = sample.encode().unwrap();
        let value: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(value["window_title"].as_str().unwrap().len(), 255);
    }
}
