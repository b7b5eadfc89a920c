// Human-readable presentation of log header metadata

use crate::dlog::{DlogError, Header, Result};
use crate::eng;

/// Extract the information from the header in a presentable form, one
/// string per line.
///
/// The voltage unit is resolved lookup-first: a scale of exactly 1000 or
/// 1 maps to `"mV"` / `"V"`, and any other scale falls back to the bare
/// reciprocal `1 / voltage_scale`. The fallback deliberately shows the
/// reciprocal while the lookup is keyed by the scale itself; downstream
/// consumers rely on this exact behavior.
pub fn format_header_info(header: &Header) -> Result<Vec<String>> {
    let voltage_units = match header.voltage_scale {
        s if s == 1000.0 => "mV".to_string(),
        s if s == 1.0 => "V".to_string(),
        s => {
            let reciprocal = 1.0 / s;
            if !reciprocal.is_finite() {
                return Err(DlogError::NonFinite(s));
            }
            reciprocal.to_string()
        }
    };

    Ok(vec![
        format!("log format: {}", header.dlog_format.name()),
        format!("stop reason: {}", header.stop_reason.name()),
        format!("number of samples: {}", header.num_samples),
        format!("voltage units: {voltage_units}"),
        format!("sample rate: {} Sa/s", eng::to_eng_string(header.sample_rate)?),
        format!("delay: {} s", eng::to_eng_string(header.delay)?),
        format!("number of channels: {}", header.num_channels),
        format!("channel map: {:?}", header.active_channels()),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dlog::tests::test_header;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_full_summary() {
        let info = format_header_info(&test_header()).unwrap();
        assert_eq!(
            info,
            vec![
                "log format: standard",
                "stop reason: manual",
                "number of samples: 3",
                "voltage units: mV",
                "sample rate: 1k Sa/s",
                "delay: 2m s",
                "number of channels: 2",
                "channel map: [0, 1]",
            ]
        );
    }

    #[test]
    fn test_voltage_unit_lookup() {
        let mut header = test_header();
        header.voltage_scale = 1000.0;
        assert_eq!(
            format_header_info(&header).unwrap()[3],
            "voltage units: mV"
        );

        header.voltage_scale = 1.0;
        assert_eq!(format_header_info(&header).unwrap()[3], "voltage units: V");
    }

    #[test]
    fn test_voltage_unit_reciprocal_fallback() {
        let mut header = test_header();
        header.voltage_scale = 2.0;
        assert_eq!(
            format_header_info(&header).unwrap()[3],
            "voltage units: 0.5"
        );

        header.voltage_scale = 0.5;
        assert_eq!(format_header_info(&header).unwrap()[3], "voltage units: 2");
    }

    #[test]
    fn test_channel_map_sliced_to_active() {
        let mut header = test_header();
        header.num_channels = 1;
        assert_eq!(
            format_header_info(&header).unwrap()[7],
            "channel map: [0]"
        );
    }

    #[test]
    fn test_idempotent() {
        let header = test_header();
        assert_eq!(
            format_header_info(&header).unwrap(),
            format_header_info(&header).unwrap()
        );
    }

    #[test]
    fn test_non_finite_rate_is_an_error() {
        let mut header = test_header();
        header.sample_rate = f64::NAN;
        assert!(matches!(
            format_header_info(&header),
            Err(DlogError::NonFinite(_))
        ));
    }
}
