/// Link into the external scheduling web view.
///
/// Carries `doctor_id`, the percent-encoded `doctor_name` and the patient's
/// external user id as `patient_id`. The query goes before any `#fragment`.
pub fn handoff_url(base_url: &str, doctor_id: i64, doctor_name: &str, patient_id: i64) -> String {
    let (base, fragment) = match base_url.split_once('#') {
        Some((base, fragment)) => (base, Some(fragment)),
        None => (base_url, None),
    };
    let separator = if base.contains('?') { '&' } else { '?' };

    let mut url = format!(
        "{}{}doctor_id={}&doctor_name={}&patient_id={}",
        base,
        separator,
        doctor_id,
        urlencoding::encode(doctor_name),
        patient_id
    );
    if let Some(fragment) = fragment {
        url.push('#');
        url.push_str(fragment);
    }
    url
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handoff_url_encodes_name() {
        let url = handoff_url("https://schedule.example.com/", 7, "Anna Smirnova", 42);
        assert_eq!(
            url,
            "https://schedule.example.com/?doctor_id=7&doctor_name=Anna%20Smirnova&patient_id=42"
        );
    }

    #[test]
    fn test_handoff_url_appends_to_existing_query() {
        let url = handoff_url("https://schedule.example.com/app?lang=ru", 3, "Д-р Иванов", 1);
        assert!(url.starts_with("https://schedule.example.com/app?lang=ru&doctor_id=3&"));
        assert!(url.contains("doctor_name=%D0%94-%D1%80%20"));
        assert!(url.ends_with("&patient_id=1"));
    }

    #[test]
    fn test_handoff_url_keeps_fragment_last() {
        let url = handoff_url("https://schedule.example.com/app?lang=ru#/slots", 7, "Anna Smirnova", 42);
        assert_eq!(
            url,
            "https://schedule.example.com/app?lang=ru&doctor_id=7&doctor_name=Anna%20Smirnova&patient_id=42#/slots"
        );

        let url = handoff_url("https://schedule.example.com/#", 7, "Anna", 42);
        assert_eq!(url, "https://schedule.example.com/?doctor_id=7&doctor_name=Anna&patient_id=42#");
    }
}
