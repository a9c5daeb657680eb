/// Combines the visibilities of two inputs that contributed to a single result.
///
/// The result must only be visible to someone who may see both inputs.
pub fn combine_visibilities(left: &str, right: &str) -> String {
    if left.is_empty() || left == right {
        right.to_owned()
    } else if right.is_empty() {
        left.to_owned()
    } else {
        format!("({left})&({right})")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_visibility_is_neutral() {
        assert_eq!(combine_visibilities("", "a"), "a");
        assert_eq!(combine_visibilities("a", ""), "a");
        assert_eq!(combine_visibilities("", ""), "");
    }

    #[test]
    fn equal_visibilities_are_kept() {
        assert_eq!(combine_visibilities("a|b", "a|b"), "a|b");
    }

    #[test]
    fn different_visibilities_are_conjuncted() {
        assert_eq!(combine_visibilities("a", "b|c"), "(a)&(b|c)");
    }
}
