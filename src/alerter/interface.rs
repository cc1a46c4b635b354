pub trait Alerter: Send + Sync {
    fn alert(&self, activity: &str, confidence: f32) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}

pub fn alert_message(activity: &str, confidence: f32) -> String {
    format!(
        "Alert: {} detected with {:.2}% confidence.",
        activity.to_uppercase(),
        confidence * 100.0
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alert_message() {
        assert_eq!(
            alert_message("fight", 0.7),
            "Alert: FIGHT detected with 70.00% confidence."
        );
    }
}
