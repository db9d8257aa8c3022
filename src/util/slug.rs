use chrono::Utc;

/// Lowercase, ASCII-alphanumeric words joined by single dashes.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_dash = false;
    for c in title.chars().flat_map(fold_accent) {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            slug.push(c.to_ascii_lowercase());
            pending_dash = false;
        } else {
            pending_dash = true;
        }
    }
    slug
}

/// Slug for a newly created CMS document, unique by creation time.
pub fn unique_slug(title: &str) -> String {
    let base = slugify(title);
    let millis = Utc::now().timestamp_millis();
    if base.is_empty() {
        millis.to_string()
    } else {
        format!("{}-{}", base, millis)
    }
}

fn fold_accent(c: char) -> Option<char> {
    let folded = match c {
        'à' | 'á' | 'â' | 'ä' | 'ã' | 'å' => 'a',
        'À' | 'Á' | 'Â' | 'Ä' | 'Ã' | 'Å' => 'a',
        'è' | 'é' | 'ê' | 'ë' | 'ě' | 'È' | 'É' | 'Ê' | 'Ë' | 'Ě' => 'e',
        'ì' | 'í' | 'î' | 'ï' | 'Ì' | 'Í' | 'Î' | 'Ï' => 'i',
        'ò' | 'ó' | 'ô' | 'ö' | 'õ' | 'Ò' | 'Ó' | 'Ô' | 'Ö' | 'Õ' => 'o',
        'ù' | 'ú' | 'û' | 'ü' | 'ů' | 'Ù' | 'Ú' | 'Û' | 'Ü' | 'Ů' => 'u',
        'ý' | 'Ý' => 'y',
        'č' | 'Č' | 'ç' | 'Ç' => 'c',
        'ď' | 'Ď' => 'd',
        'ň' | 'Ň' | 'ñ' | 'Ñ' => 'n',
        'ř' | 'Ř' => 'r',
        'š' | 'Š' => 's',
        'ť' | 'Ť' => 't',
        'ž' | 'Ž' => 'z',
        other => other,
    };
    Some(folded)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Villa with Sea View!"), "villa-with-sea-view");
        assert_eq!(slugify("  Casa   Blu -- Lucca "), "casa-blu-lucca");
        assert_eq!(slugify("Domy v Itálii: Průvodce"), "domy-v-italii-pruvodce");
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn test_unique_slug_appends_millis() {
        let slug = unique_slug("Villa Rosa");
        let (base, millis) = slug.rsplit_once('-').unwrap();
        assert_eq!(base, "villa-rosa");
        assert!(millis.parse::<i64>().is_ok());
    }
}
