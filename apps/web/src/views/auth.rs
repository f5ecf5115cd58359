use axum::response::Html;

use crate::auth::strength::PasswordStrength;
use crate::views::{escape_html, page, render_notice, Notice};

// Re-classifies on every keystroke through POST /signup/strength. Only the
// reply to the latest keystroke may update the label.
const STRENGTH_SCRIPT: &str = r#"<script>
(function () {
  var input = document.getElementById('password');
  var label = document.querySelector('.password-strength');
  var latest = 0;
  input.addEventListener('input', function () {
    var seq = ++latest;
    fetch('/signup/strength', {
      method: 'POST',
      headers: { 'Content-Type': 'application/json' },
      body: JSON.stringify({ password: input.value })
    })
      .then(function (r) { return r.json(); })
      .then(function (data) {
        if (seq === latest) {
          label.textContent = 'Password Strength: ' + data.strength;
        }
      })
      .catch(function () {});
  });
})();
</script>"#;

/// Sign-up form. Email and username are kept across a rejected submit; the
/// password fields never are.
pub fn signup_page(
    email: &str,
    username: &str,
    strength: PasswordStrength,
    notice: Option<&Notice>,
) -> Html<String> {
    let body = format!(
        r#"<h1>Sign Up</h1>
{notice}
<form class="signup-form" method="post" action="/signup">
  <input type="email" name="email" placeholder="Email" value="{email}" required>
  <input type="text" name="username" placeholder="Username" value="{username}" required>
  <input type="password" id="password" name="password" placeholder="Password" required>
  <div class="password-strength">Password Strength: {strength}</div>
  <input type="password" name="confirmPassword" placeholder="Confirm Password" required>
  <button type="submit">Sign Up</button>
</form>
<p>Already have an account? <a href="/login">Login</a></p>
{STRENGTH_SCRIPT}"#,
        notice = render_notice(notice),
        email = escape_html(email),
        username = escape_html(username),
    );
    page("Sign Up", &body)
}

pub fn login_page(email: &str, notice: Option<&Notice>) -> Html<String> {
    let body = format!(
        r#"<h1>Login</h1>
{notice}
<form class="login-form" method="post" action="/login">
  <input type="email" name="email" placeholder="Email" value="{email}" required>
  <input type="password" name="password" placeholder="Password" required>
  <button type="submit">Login</button>
</form>
<p>No account yet? <a href="/signup">Sign Up</a></p>"#,
        notice = render_notice(notice),
        email = escape_html(email),
    );
    page("Login", &body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signup_page_shows_strength_and_fields() {
        let Html(html) = signup_page("a@b.c", "alice", PasswordStrength::Moderate, None);
        assert!(html.contains(r#"<div class="password-strength">Password Strength: Moderate</div>"#));
        assert!(html.contains(r#"name="confirmPassword""#));
        assert!(html.contains(r#"value="alice""#));
        assert!(html.contains("/signup/strength"));
    }

    #[test]
    fn test_strength_script_ignores_stale_replies() {
        let Html(html) = signup_page("", "", PasswordStrength::Weak, None);
        assert!(html.contains("var seq = ++latest;"));
        assert!(html.contains("if (seq === latest)"));
    }

    #[test]
    fn test_login_page_has_placeholders_and_notice() {
        let Html(html) = login_page("", Some(&Notice::error("Invalid credentials")));
        assert!(html.contains(r#"placeholder="Email""#));
        assert!(html.contains(r#"placeholder="Password""#));
        assert!(html.contains(">Login</button>"));
        assert!(html.contains("Invalid credentials"));
    }
}
