use axum::response::Html;

use crate::input::validation::{char_count, MAX_JOB_DESCRIPTION_CHARS};
use crate::views::{escape_html, page, render_notice, Notice};

const COUNTER_SCRIPT: &str = r#"<script>
(function () {
  var area = document.querySelector('.input-textarea');
  var counter = document.querySelector('.char-counter');
  var limit = parseInt(counter.dataset.limit, 10);
  area.addEventListener('input', function () {
    var count = Array.from(area.value).length;
    counter.textContent = count + ' / ' + limit + ' characters';
    counter.classList.toggle('char-counter-exceeded', count > limit);
  });
})();
</script>"#;

fn counter_class(count: usize) -> &'static str {
    if count > MAX_JOB_DESCRIPTION_CHARS {
        "char-counter char-counter-exceeded"
    } else {
        "char-counter"
    }
}

/// Resume picker plus job-description form. `job_description` refills the
/// textarea after a submit.
pub fn input_page(job_description: &str, notice: Option<&Notice>) -> Html<String> {
    let count = char_count(job_description);
    let body = format!(
        r#"<h1>Resume &amp; Job Description</h1>
{notice}
<section class="resume-upload">
  <h2>Upload Resume</h2>
  <form method="post" action="/input/resume" enctype="multipart/form-data">
    <input type="file" name="file" accept=".pdf,.docx" required>
    <button type="submit" class="submit-button">Upload</button>
  </form>
</section>
<section class="job-description">
  <h2>Job Description</h2>
  <form method="post" action="/input/job-description">
    <textarea class="input-textarea" name="job_description" rows="12" placeholder="Paste the job description here">{text}</textarea>
    <div class="{class}" data-limit="{MAX_JOB_DESCRIPTION_CHARS}">{count} / {MAX_JOB_DESCRIPTION_CHARS} characters</div>
    <button type="submit" class="submit-button">Submit</button>
  </form>
</section>
{COUNTER_SCRIPT}"#,
        notice = render_notice(notice),
        text = escape_html(job_description),
        class = counter_class(count),
    );
    page("Input", &body)
}
