pub const DEMO_PHOTO_PREFIX: &str = "demo_photo_";

struct DemoVenue {
    name: &'static str,
    kind: &'static str,
    icon: &'static str,
    color_from: &'static str,
    color_to: &'static str,
}

const GENERIC: DemoVenue = DemoVenue {
    name: "VENUE",
    kind: "Restaurant",
    icon: "🍽️",
    color_from: "#4F46E5",
    color_to: "#10B981",
};

fn demo_venue(photo_ref: &str) -> DemoVenue {
    match photo_ref {
        "demo_photo_yolk" => DemoVenue {
            name: "YOLK",
            kind: "Breakfast &amp; Brunch",
            icon: "🍳",
            color_from: "#FF6B35",
            color_to: "#F7931E",
        },
        "demo_photo_pequod" => DemoVenue {
            name: "PEQUOD'S",
            kind: "Deep Dish Pizza",
            icon: "🍕",
            color_from: "#8B4513",
            color_to: "#CD853F",
        },
        "demo_photo_bavette" => DemoVenue {
            name: "BAVETTE'S",
            kind: "Steakhouse",
            icon: "🥩",
            color_from: "#8B0000",
            color_to: "#DC143C",
        },
        "demo_photo_portillo" => DemoVenue {
            name: "PORTILLO'S",
            kind: "Italian Beef",
            icon: "🌭",
            color_from: "#FF4500",
            color_to: "#FF6347",
        },
        "demo_photo_bigstar" => DemoVenue {
            name: "BIG STAR",
            kind: "Tacos &amp; Tequila",
            icon: "🌮",
            color_from: "#FFD700",
            color_to: "#FFA500",
        },
        _ => GENERIC,
    }
}

pub fn is_demo_reference(photo_ref: &str) -> bool {
    photo_ref.starts_with(DEMO_PHOTO_PREFIX)
}

/// Placeholder SVG for a `demo_photo_*` reference. Unknown demo references
/// get a generic card. Height defaults to the width.
pub fn render_demo_photo(photo_ref: &str, width: u32, height: Option<u32>) -> String {
    let venue = demo_venue(photo_ref);
    let height = height.unwrap_or(width);

    format!(
        r##"<svg width="{width}" height="{height}" xmlns="http://www.w3.org/2000/svg">
  <defs>
    <linearGradient id="grad1" x1="0%" y1="0%" x2="100%" y2="100%">
      <stop offset="0%" style="stop-color:{from};stop-opacity:1" />
      <stop offset="100%" style="stop-color:{to};stop-opacity:1" />
    </linearGradient>
  </defs>
  <rect width="100%" height="100%" fill="url(#grad1)"/>
  <circle cx="50%" cy="35%" r="18%" fill="white" opacity="0.9"/>
  <text x="50%" y="42%" text-anchor="middle" font-family="Arial, sans-serif" font-size="28" fill="{from}">{icon}</text>
  <text x="50%" y="65%" text-anchor="middle" font-family="Arial, sans-serif" font-size="12" fill="white" font-weight="bold">{name}</text>
  <text x="50%" y="78%" text-anchor="middle" font-family="Arial, sans-serif" font-size="10" fill="white" opacity="0.8">{kind}</text>
  <text x="50%" y="90%" text-anchor="middle" font-family="Arial, sans-serif" font-size="8" fill="white" opacity="0.6">DEMO PHOTO</text>
</svg>
"##,
        width = width,
        height = height,
        from = venue.color_from,
        to = venue.color_to,
        icon = venue.icon,
        name = venue.name,
        kind = venue.kind,
    )
}
