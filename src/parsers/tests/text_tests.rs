use crate::parsers::text::{is_license_notice, normalize_name, parse_count, split_key_values};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_name_strips_size_suffix() {
        assert_eq!(normalize_name("Ultramarine Blue 200ml Tube"), "Ultramarine Blue");
        assert_eq!(normalize_name("Hansa Yellow Light 15ml"), "Hansa Yellow Light");
        assert_eq!(normalize_name("Titanium White 5oz"), "Titanium White");
    }

    #[test]
    fn test_normalize_name_without_suffix_is_unchanged() {
        assert_eq!(normalize_name("Cadmium Red"), "Cadmium Red");
        assert_eq!(normalize_name("Quinacridone 2 Gold"), "Quinacridone 2 Gold");
        assert_eq!(normalize_name("tokio-rs/tokio"), "tokio-rs/tokio");
    }

    #[test]
    fn test_normalize_name_trims_only_trailing_whitespace() {
        assert_eq!(normalize_name("Cadmium Red  \n"), "Cadmium Red");
        assert_eq!(normalize_name("  Cadmium Red"), "  Cadmium Red");
        assert_eq!(normalize_name("Cadmium Red  15ml"), "Cadmium Red");
    }

    #[test]
    fn test_split_key_values() {
        let pairs = split_key_values("Brand: Acme | Size: 200ml\nType: Oil");
        assert_eq!(pairs.len(), 3);
        assert_eq!(pairs["Brand"], "Acme");
        assert_eq!(pairs["Size"], "200ml");
        assert_eq!(pairs["Type"], "Oil");
    }

    #[test]
    fn test_split_key_values_drops_malformed_lines() {
        let pairs = split_key_values("Brand: Acme | NoColonHere\nA: b: c\n\n");
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs["Brand"], "Acme");
    }

    #[test]
    fn test_split_key_values_only_splits_first_separator() {
        let pairs = split_key_values("Series: 1 | Pigment: PB29 | PV19");
        assert_eq!(pairs["Series"], "1");
        assert_eq!(pairs["Pigment"], "PB29 | PV19");
    }

    #[test]
    fn test_split_key_values_trims_indentation() {
        let pairs = split_key_values("\n    Lightfastness: Excellent\n    Transparency: Transparent\n");
        assert_eq!(pairs["Lightfastness"], "Excellent");
        assert_eq!(pairs["Transparency"], "Transparent");
    }

    #[test]
    fn test_parse_count() {
        assert_eq!(parse_count(" 42\n"), Ok(42));
        assert_eq!(parse_count("1,234"), Ok(1234));
        assert!(parse_count("lots").is_err());
        assert!(parse_count("").is_err());
    }

    #[test]
    fn test_license_notice() {
        assert!(is_license_notice("MIT License"));
        assert!(is_license_notice("licensed under Apache"));
        assert!(!is_license_notice("A fast web framework"));
    }
}
