use super::Language;

pub fn keywords(topic: &str, language: Language) -> String {
    format!(
        "Generate 3-5 keywords for Unsplash image search related to \"{topic}\". \
Write the keywords in the language with locale code {locale} ({name}). \
Output format: keyword1, keyword2, keyword3. Output only the keywords.",
        locale = language.code(),
        name = language.display_name(),
    )
}

pub fn landing_page(topic: &str, language: Language, image_url: &str) -> String {
    format!(
        r#"Create HTML for a simple, well-structured, and informative landing page about "{topic}". Requirements:
1. Responsive design using flexbox or CSS grid
2. Clean and modern aesthetic
3. Simple navigation with Home(/index.html) and About(/about.html) links at the top of the page
4. Hero section with a relevant Unsplash image and a clear, concise headline
5. Brief "About" section explaining the main concept or service
6. Key features or benefits section (3-4 points)
7. Simple, responsive and elegant call-to-action (CTA) button
8. Minimal footer with essential links at the bottom of the page
9. Use this image URL for the hero section: {image_url}
10. Use a color scheme that complements the hero image
11. Optimize for fast loading and readability
12. Write all page content in the language with locale code {locale} ({name}) and set <html lang="{locale}">
Output: a complete single HTML document starting with <!DOCTYPE html>, with inline CSS and minimal JS (only if needed).
Any explanations or comments should be included as HTML comments within the code.
Focus on clarity, simplicity, and effective communication of the main message.
Ensure the structure follows this order: navigation, hero, about, features, CTA, footer.
DO NOT INCLUDE ANY TEXT OR CODE OUTSIDE OF THE HTML STRUCTURE."#,
        locale = language.code(),
        name = language.display_name(),
    )
}

pub fn optimization(page: &str, language: Language) -> String {
    format!(
        r#"Optimize the following HTML content for a responsive, concise, and elegant landing page:

1. Keep a complete HTML document with <head> and <body> tags
2. Use semantic HTML5 and responsive CSS3
3. Structure: nav, hero, about, features, CTA, footer
4. Ensure all links use "./index.html" or "./about.html"
5. Make sure all site content is in the language with locale code {locale} ({name}), with proper localization and cultural adaptation
6. Don't change or remove existing image URLs, but optimize them for responsiveness
7. Implement accessibility features (alt text, ARIA)
8. Minify inline CSS

Content to optimize:
{page}

Output: a single HTML file with inline CSS and minimal JS.
Use HTML comments for explanations.
DO NOT include any content outside the HTML structure."#,
        locale = language.code(),
        name = language.display_name(),
    )
}
