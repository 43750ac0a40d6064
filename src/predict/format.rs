//! Price display formatting
//!
//! Pure function from a rupee amount to the magnitude string the frontend
//! shows. Breakpoints follow the local convention: thousands at 1,000,
//! lakhs at 100,000, crores at 10,000,000.

const CRORE: f64 = 10_000_000.0;
const LAKH: f64 = 100_000.0;
const THOUSAND: f64 = 1_000.0;

/// Format a predicted price as an LKR magnitude string. One decimal below
/// 100 units of the magnitude, none at or above.
pub fn format_price_lkr(price: f64) -> String {
    if price >= CRORE {
        let crores = price / CRORE;
        if crores < 100.0 {
            format!("LKR {crores:.1} Crores")
        } else {
            format!("LKR {crores:.0} Crores")
        }
    } else if price >= LAKH {
        let lakhs = price / LAKH;
        if lakhs < 100.0 {
            format!("LKR {lakhs:.1} Lakhs")
        } else {
            format!("LKR {lakhs:.0} Lakhs")
        }
    } else if price >= THOUSAND {
        format!("LKR {:.0}K", price / THOUSAND)
    } else {
        format!("LKR {price:.0}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crores_scale() {
        assert_eq!(format_price_lkr(12_500_000.0), "LKR 1.2 Crores");
        assert_eq!(format_price_lkr(1_250_000_000.0), "LKR 125 Crores");
    }

    #[test]
    fn test_lakhs_scale() {
        assert_eq!(format_price_lkr(350_000.0), "LKR 3.5 Lakhs");
        assert_eq!(format_price_lkr(9_990_000.0), "LKR 99.9 Lakhs");
    }

    #[test]
    fn test_thousands_scale() {
        assert_eq!(format_price_lkr(5_000.0), "LKR 5K");
    }

    #[test]
    fn test_plain_scale() {
        assert_eq!(format_price_lkr(500.0), "LKR 500");
    }

    #[test]
    fn test_breakpoint_edges() {
        assert_eq!(format_price_lkr(999.0), "LKR 999");
        assert_eq!(format_price_lkr(1_000.0), "LKR 1K");
        assert_eq!(format_price_lkr(100_000.0), "LKR 1.0 Lakhs");
        assert_eq!(format_price_lkr(10_000_000.0), "LKR 1.0 Crores");
    }
}
