use super::*;

pub(crate) struct StatusLine {
  base: String,
  transient: Option<(String, Instant)>,
}

impl StatusLine {
  const TRANSIENT_TTL: Duration = Duration::from_secs(3);

  pub(crate) fn base(&self) -> &str {
    &self.base
  }

  pub(crate) fn current(&self) -> &str {
    match &self.transient {
      Some((message, _)) => message,
      None => &self.base,
    }
  }

  pub(crate) fn flash(&mut self, message: String) {
    self.transient = Some((message, Instant::now()));
  }

  pub(crate) fn new(base: String) -> Self {
    Self {
      base,
      transient: None,
    }
  }

  pub(crate) fn set(&mut self, base: String) {
    self.base = base;
    self.transient = None;
  }

  pub(crate) fn tick(&mut self) {
    self.tick_at(Instant::now());
  }

  fn tick_at(&mut self, now: Instant) {
    if let Some((_, shown_at)) = &self.transient
      && now.duration_since(*shown_at) >= Self::TRANSIENT_TTL
    {
      self.transient = None;
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn flash_overrides_the_base_until_it_expires() {
    let mut status = StatusLine::new("hint".into());

    status.flash("boom".into());
    assert_eq!(status.current(), "boom");

    status.tick_at(Instant::now());
    assert_eq!(status.current(), "boom");

    status.tick_at(Instant::now() + StatusLine::TRANSIENT_TTL);
    assert_eq!(status.current(), "hint");
  }

  #[test]
  fn set_replaces_the_base_and_clears_any_transient() {
    let mut status = StatusLine::new("hint".into());

    status.flash("boom".into());
    status.set("fresh".into());

    assert_eq!(status.base(), "fresh");
    assert_eq!(status.current(), "fresh");
  }
}
