/// Truncate a string to a maximum length in characters, adding "..." if truncated
pub fn truncate(s: &str, max_len: usize) -> String {
  if s.chars().count() <= max_len {
    s.to_string()
  } else {
    let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
    format!("{}...", kept)
  }
}

/// Format a dollar amount as `$1,234.56`
pub fn format_amount(amount: f64) -> String {
  let total_cents = (amount.abs() * 100.0).round() as u64;
  let digits = (total_cents / 100).to_string();

  let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
  for (i, c) in digits.chars().enumerate() {
    if i > 0 && (digits.len() - i) % 3 == 0 {
      grouped.push(',');
    }
    grouped.push(c);
  }

  let sign = if amount < 0.0 && total_cents > 0 { "-" } else { "" };
  format!("{}${}.{:02}", sign, grouped, total_cents % 100)
}
