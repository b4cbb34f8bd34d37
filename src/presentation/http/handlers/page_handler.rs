use axum::response::Html;

const HOME_PAGE: &str = r#"<!doctype html>
<html lang="en">
<head><meta charset="utf-8"><title>BAZAFARM TECHNOLOGY</title></head>
<body>
<h1>BAZAFARM TECHNOLOGY</h1>
<p>Welcome to <strong>BAZAFARM TECHNOLOGY</strong> by STES GROUP Ltd!</p>
<p>BAZAFARM is a solar-powered IoT device that revolutionizes farming:</p>
<ul>
  <li><strong>Real-time Monitoring</strong>: Measure water level, soil temperature, and fertility.</li>
  <li><strong>Smart Decision-Making</strong>: Access data on your mobile, tablet, or PC via Internet.</li>
  <li><strong>Optimized Farming</strong>: Achieve high crop yields with precise environmental data.</li>
  <li><strong>Weather Forecasts</strong>: Stay informed about upcoming weather conditions.</li>
</ul>
<p>The Farm Assistant answers questions about your own PDF documents. Create a session with
<code>POST /sessions</code>, upload a file, process it, then ask away.</p>
<nav><a href="/">Home</a> | <a href="/contact">Contact</a></nav>
<footer><hr><p>&copy; 2024 BAZAFARM TECHNOLOGY by STES GROUP Ltd. All rights reserved.</p></footer>
</body>
</html>
"#;

const CONTACT_PAGE: &str = r#"<!doctype html>
<html lang="en">
<head><meta charset="utf-8"><title>Contact STES GROUP Ltd</title></head>
<body>
<h1>Contact STES GROUP Ltd</h1>
<p>We'd love to hear from you! For any questions about BAZAFARM TECHNOLOGY, please reach out.</p>
<ul>
  <li><strong>Email:</strong> <a href="mailto:info@stesgroup.rw">info@stesgroup.rw</a></li>
  <li><strong>Website:</strong> <a href="https://www.stesgroup.rw">STES GROUP Ltd</a></li>
</ul>
<p>If you'd like to request a feature or report an issue with your BAZAFARM device, please contact our support team.</p>
<nav><a href="/">Home</a> | <a href="/contact">Contact</a></nav>
<footer><hr><p>&copy; 2024 BAZAFARM TECHNOLOGY by STES GROUP Ltd. All rights reserved.</p></footer>
</body>
</html>
"#;

pub async fn home_page() -> Html<&'static str> {
    Html(HOME_PAGE)
}

pub async fn contact_page() -> Html<&'static str> {
    Html(CONTACT_PAGE)
}
