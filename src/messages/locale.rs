/// Upper-cases `s` following Turkish rules: dotted `i` becomes `İ` and dotless `ı` becomes `I`.
/// Every other character goes through Unicode upper-casing.
pub fn to_upper_tr(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            'i' => out.push('İ'),
            'ı' => out.push('I'),
            _ => out.extend(c.to_uppercase()),
        }
    }
    out
}
