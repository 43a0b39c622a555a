use std::collections::HashMap;
use std::sync::LazyLock;

use scraper::{Html, Selector};
use tracing::{debug, info};

use super::{names, text_of};

static LI_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("li").unwrap());
static CODE_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("span.monospaced").unwrap());
static LINK_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a").unwrap());

/// Normalized entity name → ISO 3166-1 alpha-3 code.
pub type CodeMap = HashMap<String, String>;

/// Collect `<li><span class="monospaced">XXX</span> <a>Name</a></li>` pairs.
pub fn extract(doc: &Html) -> CodeMap {
    let mut codes = CodeMap::new();

    for li in doc.select(&LI_SEL) {
        let (Some(span), Some(link)) = (li.select(&CODE_SEL).next(), li.select(&LINK_SEL).next())
        else {
            continue;
        };

        let code = text_of(span);
        let name = names::normalize(&text_of(link));
        if !is_alpha3(&code) {
            debug!(code = %code, name = %name, "Rejected code");
            continue;
        }
        codes.insert(name, code);
    }

    info!("Scraped {} ISO codes", codes.len());
    codes
}

/// Exactly three characters, at least one cased and none lowercase.
pub fn is_alpha3(code: &str) -> bool {
    code.chars().count() == 3
        && code.chars().any(char::is_uppercase)
        && !code.chars().any(char::is_lowercase)
}
