//! Bare HTML pages plus one-shot flash messages carried in a cookie.

use axum::response::Html;
use axum_extra::extract::cookie::{Cookie, CookieJar};

const FLASH_COOKIE: &str = "flash";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flash {
    SignupOk,
    EmailTaken,
    PasswordMismatch,
    LoginOk,
    BadCredentials,
    LoggedOut,
}

impl Flash {
    const ALL: [Flash; 6] = [
        Flash::SignupOk,
        Flash::EmailTaken,
        Flash::PasswordMismatch,
        Flash::LoginOk,
        Flash::BadCredentials,
        Flash::LoggedOut,
    ];

    fn code(&self) -> &'static str {
        match self {
            Flash::SignupOk => "signup_ok",
            Flash::EmailTaken => "email_taken",
            Flash::PasswordMismatch => "password_mismatch",
            Flash::LoginOk => "login_ok",
            Flash::BadCredentials => "bad_credentials",
            Flash::LoggedOut => "logged_out",
        }
    }

    fn from_code(code: &str) -> Option<Flash> {
        Self::ALL.into_iter().find(|f| f.code() == code)
    }

    pub fn message(&self) -> &'static str {
        match self {
            Flash::SignupOk => "✅ Signup successful! Please log in.",
            Flash::EmailTaken => "⚠️ Email already registered!",
            Flash::PasswordMismatch => "⚠️ Passwords do not match.",
            Flash::LoginOk => "✅ Login successful!",
            Flash::BadCredentials => "❌ Invalid email or password!",
            Flash::LoggedOut => "👋 You have been logged out.",
        }
    }

    pub fn category(&self) -> &'static str {
        match self {
            Flash::SignupOk | Flash::LoginOk => "success",
            Flash::EmailTaken | Flash::PasswordMismatch | Flash::BadCredentials => "error",
            Flash::LoggedOut => "info",
        }
    }
}

pub fn set_flash(jar: CookieJar, flash: Flash) -> CookieJar {
    jar.add(Cookie::build((FLASH_COOKIE, flash.code())).path("/"))
}

/// Read and clear the pending flash message.
pub fn take_flash(jar: CookieJar) -> (CookieJar, Option<Flash>) {
    let Some(cookie) = jar.get(FLASH_COOKIE) else {
        return (jar, None);
    };
    let flash = Flash::from_code(cookie.value());
    (jar.remove(Cookie::build(FLASH_COOKIE).path("/")), flash)
}

pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn layout(title: &str, flash: Option<Flash>, body: &str) -> Html<String> {
    let flash = flash
        .map(|f| format!(r#"<p class="flash {}">{}</p>"#, f.category(), f.message()))
        .unwrap_or_default();

    Html(format!(
        r#"<!doctype html>
<html>
<head><meta charset="utf-8"><title>{title} · Emotune</title></head>
<body>
{flash}
{body}
</body>
</html>"#
    ))
}

pub fn landing(logged_in: bool) -> Html<String> {
    let next = if logged_in {
        r#"<a href="/recommend">Get recommendations</a> · <a href="/logout">Log out</a>"#
    } else {
        r#"<a href="/login">Log in</a> · <a href="/signup">Sign up</a>"#
    };
    layout(
        "Welcome",
        None,
        &format!("<h1>Emotune</h1><p>Songs for how you feel.</p><p>{next}</p>"),
    )
}

pub fn signup(flash: Option<Flash>) -> Html<String> {
    layout(
        "Sign up",
        flash,
        r#"<h1>Sign up</h1>
<form method="post" action="/signup">
  <input name="email" type="email" placeholder="Email" required>
  <input name="password" type="password" placeholder="Password" required>
  <input name="confirm_password" type="password" placeholder="Confirm password" required>
  <input name="age" type="number" min="0" placeholder="Age (optional)">
  <input name="gender" placeholder="Gender (optional)">
  <button type="submit">Sign up</button>
</form>
<p><a href="/login">Already registered? Log in</a></p>"#,
    )
}

pub fn login(flash: Option<Flash>) -> Html<String> {
    layout(
        "Log in",
        flash,
        r#"<h1>Log in</h1>
<form method="post" action="/login" class="login-form">
  <input name="email" type="email" placeholder="Email" required>
  <input name="password" type="password" placeholder="Password" required>
  <button type="submit">Log in</button>
</form>
<p><a href="/signup">New here? Sign up</a></p>"#,
    )
}

pub fn recommend(email: &str, flash: Option<Flash>) -> Html<String> {
    let body = format!(
        r#"<h1>How are you feeling, {email}?</h1>
<p>
  <button data-emoji="😊">😊</button>
  <button data-emoji="😢">😢</button>
  <button data-emoji="😡">😡</button>
  <button data-emoji="😲">😲</button>
  <button data-emoji="🙂">🙂</button>
</p>
<p><video id="camera" autoplay playsinline width="320"></video><br>
  <button id="snap">Detect my mood</button></p>
<h2 id="mood"></h2>
<ul id="songs"></ul>
<p><a href="/logout">Log out</a></p>
<script>
const show = (data) => {{
  const list = document.getElementById("songs");
  list.innerHTML = "";
  if (data.error) {{ document.getElementById("mood").textContent = data.error; return; }}
  document.getElementById("mood").textContent = "Mood: " + data.mood;
  for (const s of data.songs) {{
    const li = document.createElement("li");
    const a = document.createElement("a");
    a.href = s.spotify_url; a.target = "_blank";
    a.textContent = s.name + " · " + s.singer;
    li.appendChild(a); list.appendChild(li);
  }}
}};
const post = (url, body) => fetch(url, {{
  method: "POST", headers: {{"Content-Type": "application/json"}}, body: JSON.stringify(body)
}}).then(r => r.json()).then(show);
document.querySelectorAll("[data-emoji]").forEach(b =>
  b.addEventListener("click", () => post("/emoji_recommend", {{emoji: b.dataset.emoji}})));
const video = document.getElementById("camera");
navigator.mediaDevices?.getUserMedia({{video: true}}).then(s => video.srcObject = s).catch(() => {{}});
document.getElementById("snap").addEventListener("click", () => {{
  const canvas = document.createElement("canvas");
  canvas.width = video.videoWidth; canvas.height = video.videoHeight;
  canvas.getContext("2d").drawImage(video, 0, 0);
  post("/detect_mood", {{image: canvas.toDataURL("image/jpeg")}});
}});
</script>"#,
        email = escape_html(email)
    );
    layout("Recommendations", flash, &body)
}
