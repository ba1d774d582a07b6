// kiosk-core/src/storefront/images.rs

//! Image fallback chains. The kiosk tries each candidate URL in order and
//! shows the first one that loads.

pub const ITEM_IMAGE_BASE: &str = "/images/items";
pub const CATEGORY_IMAGE_BASE: &str = "/images/categories";
pub const PLACEHOLDER_IMAGE: &str = "/images/placeholder.png";

const NAME_EXTENSIONS: [&str; 3] = ["jpg", "png", "webp"];
const ID_EXTENSIONS: [&str; 2] = ["jpg", "png"];

fn is_absolute(reference: &str) -> bool {
  reference.starts_with('/') || reference.starts_with("http://") || reference.starts_with("https://")
}

fn under(base: &str, reference: &str) -> String {
  if is_absolute(reference) {
    reference.to_string()
  } else {
    format!("{}/{}", base, reference)
  }
}

/// Splits `burger.jpg` into `burger`; names without an extension are returned whole.
fn stem(reference: &str) -> &str {
  let file_start = reference.rfind('/').map_or(0, |i| i + 1);
  match reference[file_start..].rfind('.') {
    Some(dot) if dot > 0 => &reference[..file_start + dot],
    _ => reference,
  }
}

fn push_unique(candidates: &mut Vec<String>, url: String) {
  if !candidates.contains(&url) {
    candidates.push(url);
  }
}

/// Candidate URLs for an item picture, most specific first:
/// the image id as given, the image id under each known extension, the item
/// id under each known extension, then the placeholder.
pub fn item_image_candidates(image_id: Option<&str>, item_id: i64) -> Vec<String> {
  let mut candidates = Vec::new();

  if let Some(reference) = image_id.map(str::trim).filter(|r| !r.is_empty()) {
    push_unique(&mut candidates, under(ITEM_IMAGE_BASE, reference));
    let stem = stem(reference);
    for ext in NAME_EXTENSIONS {
      push_unique(&mut candidates, under(ITEM_IMAGE_BASE, &format!("{}.{}", stem, ext)));
    }
  }

  for ext in ID_EXTENSIONS {
    push_unique(&mut candidates, format!("{}/{}.{}", ITEM_IMAGE_BASE, item_id, ext));
  }
  push_unique(&mut candidates, PLACEHOLDER_IMAGE.to_string());
  candidates
}

/// Candidate URLs for a category tile.
pub fn category_image_candidates(image: Option<&str>) -> Vec<String> {
  let mut candidates = Vec::new();
  if let Some(reference) = image.map(str::trim).filter(|r| !r.is_empty()) {
    push_unique(&mut candidates, under(CATEGORY_IMAGE_BASE, reference));
  }
  push_unique(&mut candidates, PLACEHOLDER_IMAGE.to_string());
  candidates
}
