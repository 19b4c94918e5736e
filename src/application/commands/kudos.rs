pub const MISSING_TEAMMATE: &str = "Please tell me who to thank!";

/// Thank the teammate named by the first argument
pub fn kudos(args: &[String]) -> String {
    match args.first() {
        Some(teammate) => format!("Hey {}, thanks for being awesome!", teammate),
        None => MISSING_TEAMMATE.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kudos_without_teammate() {
        assert_eq!(kudos(&[]), MISSING_TEAMMATE);
    }

    #[test]
    fn test_kudos_names_first_argument() {
        let args = vec!["@alice".to_string(), "and".to_string(), "@bob".to_string()];
        assert_eq!(kudos(&args), "Hey @alice, thanks for being awesome!");
    }
}
