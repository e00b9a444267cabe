//! Terminal frontend: command parsing and view rendering.
//!
//! Rendering is split into pure `render_*` functions returning strings so
//! the layout is testable; only the run loop and the notifier touch stdout.

#![allow(clippy::print_stdout)]

use std::io::Write as _;

use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

use frosted_mango_core::cart::Cart;
use frosted_mango_core::navigator::View;
use frosted_mango_core::order::{CheckoutForm, DeliveryMethod};
use frosted_mango_core::resolver::DetailSession;
use frosted_mango_core::types::{CategoryId, CurrencyFormatter, Facet, RubleFormatter};

use crate::api::OrderClient;
use crate::app::{HomeListing, Notice, NoticeKind, Notifier, Shop};
use crate::error::AppError;

// =============================================================================
// Notifier
// =============================================================================

/// Prints notices straight to the terminal.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn notify(&self, notice: Notice) {
        match notice.kind {
            NoticeKind::Success => println!("✓ {}", notice.message),
            NoticeKind::Error => println!("✗ {}", notice.message),
        }
    }
}

// =============================================================================
// Commands
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Home,
    Open(String),
    Select(Facet, String),
    Clear(Facet),
    Add,
    Cart,
    Remove(usize),
    Checkout,
    Submit,
    Back,
    Search(String),
    Category(Option<CategoryId>),
    Help,
    Quit,
    Unknown(String),
}

fn parse_facet(word: &str) -> Option<Facet> {
    match word {
        "memory" | "mem" => Some(Facet::Memory),
        "color" => Some(Facet::Color),
        _ => None,
    }
}

/// Parse one input line. Blank lines parse to `None`.
#[must_use]
pub fn parse_command(line: &str) -> Option<Command> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return None;
    }
    let (word, rest) = match trimmed.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (trimmed, ""),
    };

    let command = match word {
        "home" => Command::Home,
        "open" if !rest.is_empty() => Command::Open(rest.to_string()),
        "select" => match rest.split_once(char::is_whitespace) {
            Some((facet, value)) if !value.trim().is_empty() => match parse_facet(facet) {
                Some(facet) => Command::Select(facet, value.trim().to_string()),
                None => Command::Unknown(trimmed.to_string()),
            },
            _ => Command::Unknown(trimmed.to_string()),
        },
        "clear" => match parse_facet(rest) {
            Some(facet) => Command::Clear(facet),
            None => Command::Unknown(trimmed.to_string()),
        },
        "add" => Command::Add,
        "cart" => Command::Cart,
        "remove" => match rest.parse::<usize>() {
            Ok(index) => Command::Remove(index),
            Err(_) => Command::Unknown(trimmed.to_string()),
        },
        "checkout" => Command::Checkout,
        "submit" => Command::Submit,
        "back" => Command::Back,
        "search" => Command::Search(rest.to_string()),
        "category" => {
            if rest == "all" || rest.is_empty() {
                Command::Category(None)
            } else {
                match rest.parse::<i64>() {
                    Ok(id) => Command::Category(Some(CategoryId::new(id))),
                    Err(_) => Command::Unknown(trimmed.to_string()),
                }
            }
        }
        "help" => Command::Help,
        "quit" | "exit" => Command::Quit,
        _ => Command::Unknown(trimmed.to_string()),
    };
    Some(command)
}

// =============================================================================
// Rendering
// =============================================================================

const FORMATTER: RubleFormatter = RubleFormatter;

#[must_use]
pub fn render_view(shop: &Shop) -> String {
    let body = match shop.navigator().view() {
        View::Home => render_home(shop),
        View::Detail { .. } => shop.session().map_or_else(
            || render_home(shop),
            render_detail,
        ),
        View::Cart => render_cart(shop.cart()),
        View::Checkout => render_checkout(shop.cart()),
    };
    format!("{body}\nКорзина: {} тов.", shop.cart().count())
}

fn render_home(shop: &Shop) -> String {
    let mut out = String::from("== Главная ==\n");
    match shop.home_listing() {
        HomeListing::Empty => out.push_str("Каталог пуст\n"),
        HomeListing::Sections(sections) => {
            for section in sections {
                out.push_str(&format!("-- {} --\n", section.category.name));
                for card in &section.cards {
                    out.push_str(&render_card(card.name.as_str(), card));
                }
                if section.truncated {
                    out.push_str(&format!(
                        "  … смотреть все (category {})\n",
                        section.category.id
                    ));
                }
            }
        }
        HomeListing::SearchResults(cards) => {
            out.push_str("-- Результаты поиска --\n");
            for card in &cards {
                out.push_str(&render_card(card.name.as_str(), card));
            }
        }
        HomeListing::NoSearchMatches { query } => {
            out.push_str(&format!("По запросу «{query}» ничего не найдено\n"));
        }
    }
    out
}

fn render_card(name: &str, card: &frosted_mango_core::catalog::ProductVariant) -> String {
    format!("  {name} — {}\n", FORMATTER.format_from(card.price))
}

fn render_detail(session: &DetailSession) -> String {
    let resolution = session.resolution();
    let price = if resolution.matched.is_some() {
        FORMATTER.format(resolution.display_price)
    } else {
        FORMATTER.format_from(resolution.display_price)
    };

    let mut out = format!("== {} ==\n{price}\n", session.base_name());

    for &facet in &Facet::ALL {
        let values = session.option_values(facet);
        if values.is_empty() {
            continue;
        }
        out.push_str(&format!("{facet}:"));
        for value in values {
            let selected = session.selection().get(facet) == Some(value);
            let available = resolution
                .availability
                .get(&facet)
                .and_then(|per_value| per_value.get(value))
                .copied()
                .unwrap_or(false);
            let marker = if selected {
                format!(" [{value}]")
            } else if available {
                format!(" ({value})")
            } else {
                format!(" ~{value}~")
            };
            out.push_str(&marker);
        }
        out.push('\n');
    }

    if resolution.ambiguous {
        out.push_str("! Несколько вариантов с одинаковыми параметрами\n");
    }
    out.push_str(if resolution.purchasable {
        "Команда: add — в корзину\n"
    } else {
        "Выберите параметры, чтобы добавить в корзину\n"
    });
    out
}

fn render_cart(cart: &Cart) -> String {
    let mut out = String::from("== Корзина ==\n");
    if cart.is_empty() {
        out.push_str("Корзина пуста\n");
        return out;
    }
    for (index, line) in cart.lines().iter().enumerate() {
        let options = line.options_summary();
        if options.is_empty() {
            out.push_str(&format!(
                "{index}. {} — {}\n",
                line.name,
                FORMATTER.format(line.price)
            ));
        } else {
            out.push_str(&format!(
                "{index}. {} ({options}) — {}\n",
                line.name,
                FORMATTER.format(line.price)
            ));
        }
    }
    out.push_str(&format!("Итого: {}\n", FORMATTER.format(cart.total())));
    out
}

fn render_checkout(cart: &Cart) -> String {
    format!(
        "== Оформление заказа ==\nПозиции: {}, итого {}\nКоманда: submit — заполнить и отправить\n",
        cart.count(),
        FORMATTER.format(cart.total())
    )
}

const HELP: &str = "\
Команды:
  open <товар>         открыть карточку товара
  select mem|color <v> выбрать опцию
  clear mem|color      сбросить опцию
  add                  добавить в корзину
  cart                 корзина
  remove <n>           удалить позицию
  checkout             оформление заказа
  submit               отправить заказ
  search <запрос>      поиск
  category <id>|all    фильтр по категории
  home | back          на главную
  quit                 выход";

// =============================================================================
// Run loop
// =============================================================================

fn flush_prompt() -> Result<(), AppError> {
    print!("> ");
    std::io::stdout().flush()?;
    Ok(())
}

async fn prompt_line(lines: &mut Lines<BufReader<Stdin>>, label: &str) -> Result<String, AppError> {
    print!("{label}: ");
    std::io::stdout().flush()?;
    Ok(lines.next_line().await?.unwrap_or_default().trim().to_string())
}

async fn prompt_checkout_form(
    lines: &mut Lines<BufReader<Stdin>>,
) -> Result<CheckoutForm, AppError> {
    let fio = prompt_line(lines, "ФИО").await?;
    let phone = prompt_line(lines, "Телефон").await?;
    let email = prompt_line(lines, "Email").await?;
    let delivery = prompt_line(lines, "Доставка? (да/нет)").await?;
    let delivery_method = if delivery.eq_ignore_ascii_case("да") {
        DeliveryMethod::Delivery
    } else {
        DeliveryMethod::Pickup
    };
    let address = if delivery_method == DeliveryMethod::Delivery {
        Some(prompt_line(lines, "Адрес").await?)
    } else {
        None
    };
    let telegram_username = prompt_line(lines, "Telegram (необязательно)").await?;
    let comment = prompt_line(lines, "Комментарий (необязательно)").await?;

    Ok(CheckoutForm {
        fio,
        phone,
        email,
        delivery_method,
        telegram_username: Some(telegram_username),
        comment: Some(comment),
        address,
    })
}

/// Drive the shop until the shopper quits or stdin closes.
///
/// # Errors
///
/// Returns an [`AppError`] when the terminal itself fails; shop-level
/// failures (rejected selections, submission errors) are rendered inline
/// and never abort the loop.
pub async fn run(mut shop: Shop, order_client: OrderClient) -> Result<(), AppError> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("{HELP}\n");
    println!("{}", render_view(&shop));
    flush_prompt()?;

    while let Some(line) = lines.next_line().await? {
        let Some(command) = parse_command(&line) else {
            flush_prompt()?;
            continue;
        };

        match command {
            Command::Home => shop.filter_category(None),
            Command::Open(name) => shop.open_product(&name),
            Command::Select(facet, value) => {
                if let Err(err) = shop.select_option(facet, &value) {
                    println!("✗ {err}");
                }
            }
            Command::Clear(facet) => shop.clear_option(facet),
            Command::Add => shop.add_to_cart(),
            Command::Cart => shop.open_cart(),
            Command::Remove(index) => shop.remove_line(index),
            Command::Checkout => {
                shop.open_checkout();
            }
            Command::Submit => {
                if shop.navigator().view() == &View::Checkout {
                    let form = prompt_checkout_form(&mut lines).await?;
                    shop.submit_order(&order_client, form).await;
                } else {
                    println!("✗ Сначала откройте оформление заказа (checkout)");
                }
            }
            Command::Back => shop.go_back(),
            Command::Search(query) => shop.search(&query),
            Command::Category(category) => shop.filter_category(category),
            Command::Help => println!("{HELP}"),
            Command::Quit => break,
            Command::Unknown(input) => println!("✗ Неизвестная команда: {input}"),
        }

        println!("\n{}", render_view(&shop));
        flush_prompt()?;
    }

    Ok(())
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use frosted_mango_core::types::{Price, VariantId};

    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(
            parse_command("open Phone X").unwrap(),
            Command::Open("Phone X".to_string())
        );
        assert_eq!(
            parse_command("select mem 256GB").unwrap(),
            Command::Select(Facet::Memory, "256GB".to_string())
        );
        assert_eq!(
            parse_command("select color Белый").unwrap(),
            Command::Select(Facet::Color, "Белый".to_string())
        );
        assert_eq!(parse_command("remove 2").unwrap(), Command::Remove(2));
        assert_eq!(
            parse_command("category 3").unwrap(),
            Command::Category(Some(CategoryId::new(3)))
        );
        assert_eq!(parse_command("category all").unwrap(), Command::Category(None));
        assert_eq!(parse_command("  "), None);
        assert!(matches!(
            parse_command("frobnicate").unwrap(),
            Command::Unknown(_)
        ));
        assert!(matches!(
            parse_command("select size XL").unwrap(),
            Command::Unknown(_)
        ));
    }

    #[test]
    fn test_render_cart_lists_lines_and_total() {
        let mut cart = Cart::new();
        cart.add(&frosted_mango_core::catalog::ProductVariant {
            id: VariantId::new(1),
            name: "Phone X".to_string(),
            price: Price::from_units(79_990),
            memory: frosted_mango_core::types::FacetValue::Value("256GB".to_string()),
            color: frosted_mango_core::types::FacetValue::NotApplicable,
            category_id: frosted_mango_core::types::CategoryId::new(1),
            image_urls: Vec::new(),
        })
        .unwrap();

        let rendered = render_cart(&cart);
        assert!(rendered.contains("0. Phone X (256GB) — 79 990 ₽"));
        assert!(rendered.contains("Итого: 79 990 ₽"));
    }

    #[test]
    fn test_render_empty_cart() {
        assert!(render_cart(&Cart::new()).contains("Корзина пуста"));
    }

    #[test]
    fn test_render_home_with_empty_catalog() {
        let shop = Shop::new(Box::new(crate::app::LogNotifier));
        assert!(render_home(&shop).contains("Каталог пуст"));
    }
}
