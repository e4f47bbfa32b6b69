use serde_json::Value;

use crate::{
    error::{BatchError, MAX_BATCH_SIZE},
    validator::validate,
};

/// Applies the batch preconditions and keeps the entries that validate,
/// in input order.
pub fn valid_ips<S: AsRef<str>>(ips: &[S]) -> Result<Vec<&str>, BatchError> {
    check_len(ips.len())?;
    keep_valid(ips.iter().map(|ip| ip.as_ref()), ips.len())
}

/// Same as [`valid_ips`] for untyped input; non-string entries are dropped.
pub fn valid_ips_value(ips: &Value) -> Result<Vec<&str>, BatchError> {
    let ips = ips.as_array().ok_or(BatchError::NotArray)?;
    check_len(ips.len())?;
    keep_valid(ips.iter().filter_map(Value::as_str), ips.len())
}

fn check_len(len: usize) -> Result<(), BatchError> {
    if len == 0 {
        return Err(BatchError::Empty);
    }
    if len > MAX_BATCH_SIZE {
        return Err(BatchError::TooMany);
    }
    Ok(())
}

fn keep_valid<'a>(
    ips: impl Iterator<Item = &'a str>,
    total: usize,
) -> Result<Vec<&'a str>, BatchError> {
    let valid: Vec<&str> = ips.filter(|ip| validate(ip)).collect();
    if valid.is_empty() {
        return Err(BatchError::NoValidIps);
    }
    if valid.len() < total {
        debug!("dropped {} invalid ip(s) from batch", total - valid.len());
    }
    Ok(valid)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn preconditions_are_checked_in_order() {
        let empty: [&str; 0] = [];
        assert_eq!(valid_ips(&empty), Err(BatchError::Empty));

        let too_many = vec!["not-an-ip"; MAX_BATCH_SIZE + 1];
        assert_eq!(valid_ips(&too_many), Err(BatchError::TooMany));

        assert_eq!(valid_ips(&["not-an-ip"]), Err(BatchError::NoValidIps));
    }

    #[test]
    fn exactly_the_maximum_is_accepted() {
        let ips = vec!["8.8.8.8"; MAX_BATCH_SIZE];
        assert_eq!(valid_ips(&ips).unwrap().len(), MAX_BATCH_SIZE);
    }

    #[test]
    fn invalid_entries_are_dropped_keeping_order_and_duplicates() {
        let ips = vec![
            String::from("1.1.1.1"),
            String::from("bogus"),
            String::from("8.8.8.8"),
            String::from("1.1.1.1"),
        ];
        assert_eq!(
            valid_ips(&ips).unwrap(),
            vec!["1.1.1.1", "8.8.8.8", "1.1.1.1"]
        );
    }

    #[test]
    fn untyped_input_must_be_an_array() {
        assert_eq!(
            valid_ips_value(&json!("8.8.8.8")),
            Err(BatchError::NotArray)
        );
        assert_eq!(valid_ips_value(&Value::Null), Err(BatchError::NotArray));
        assert_eq!(valid_ips_value(&json!([])), Err(BatchError::Empty));
        assert_eq!(
            valid_ips_value(&json!([null, 42, "::1"])).unwrap(),
            vec!["::1"]
        );
        assert_eq!(
            valid_ips_value(&json!([null, 42])),
            Err(BatchError::NoValidIps)
        );
    }
}
