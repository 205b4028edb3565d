/*!

  The input unit of table construction: one regular expression tagged
  with a token category and a priority. Lower priority values win when
  two patterns accept the same longest lexeme; patterns with equal
  priority fall back to their position in the list.

*/

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternSpec {
  pub source: String,   //< The regular expression
  pub category: String, //< Token category carried into emitted tokens
  pub priority: u32,    //< Lower value = higher priority
}

impl PatternSpec {
  pub fn new(source: &str, category: &str) -> PatternSpec {
    PatternSpec::with_priority(source, category, 0)
  }

  pub fn with_priority(source: &str, category: &str, priority: u32) -> PatternSpec {
    PatternSpec {
      source: source.to_string(),
      category: category.to_string(),
      priority,
    }
  }
}
