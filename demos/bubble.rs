//! Render a reply bubble to `bubble.png`.
//!
//! Usage: `cargo run --example bubble -- <font.ttf> [bold.ttf] [avatar.png]`

use bubble_gen::{render, Avatar, BubbleConfig, FontBook, FontRoles, Message, Mode, Palette, Side};

fn main() {
    let mut args = std::env::args().skip(1);
    let regular = args.next().expect("usage: bubble <font.ttf> [bold.ttf] [avatar.png]");
    let bold = args.next();
    let avatar = args.next();

    // load the fonts to draw with
    let mut fonts = FontBook::new();
    let regular = fonts
        .load_font(std::fs::read(regular).expect("can read font"))
        .expect("can load font");
    let bold = match bold {
        Some(path) => fonts
            .load_font(std::fs::read(path).expect("can read bold font"))
            .expect("can load bold font"),
        None => regular,
    };

    let author = "Kenton Hamaluik";
    let avatar = Avatar::decode(
        avatar.and_then(|path| std::fs::read(path).ok()).as_deref(),
        author,
    );

    let message = Message::new(lipsum::lipsum(40), author)
        .sent_at(chrono::Local::now())
        .quote("Lorem Ipsum", lipsum::lipsum_title());

    let mut config = BubbleConfig::new(FontRoles::new(regular, bold));
    config
        .mode(Mode::Reply)
        .side(Side::Left)
        .width(bubble_gen::Px(640.0))
        .palette(Palette::resolve(Some("telegramDark"), None));

    let bubble = render(&message, &avatar, &config, &fonts).expect("can render bubble");
    bubble
        .into_image()
        .save("bubble.png")
        .expect("can write bubble.png");
}
