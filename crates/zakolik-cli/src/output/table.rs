use zakolik_core::pricing::{Quote, QuoteResult};

pub fn print(result: &QuoteResult, show_all: bool) {
    let trip = &result.trip;
    println!(
        "Trip: {} km, {} to {} ({} billable min)",
        trip.km,
        trip.begin.format("%a %Y-%m-%d %H:%M"),
        trip.end.format("%a %Y-%m-%d %H:%M"),
        result.billable_minutes
    );
    if trip.airport_leave {
        println!("  starts at Prague airport");
    }
    if trip.airport_enter {
        println!("  ends at Prague airport");
    }
    println!();

    let rows: Vec<&Quote> = if show_all {
        result.quotes.iter().collect()
    } else {
        result.cheapest_per_car_type()
    };

    let option_width = rows
        .iter()
        .map(|q| q.option.to_string().chars().count())
        .max()
        .unwrap_or(13)
        .max("Option".len());
    let multi_provider = rows
        .first()
        .is_some_and(|first| rows.iter().any(|q| q.provider != first.provider));

    if multi_provider {
        print!("  {:<10}", "Provider");
    }
    println!(
        "  {:<10} {:<8} {:<width$} {:>12}",
        "Tariff",
        "Car",
        "Option",
        "Total CZK",
        width = option_width
    );

    let cheapest_total = result.cheapest().map(|q| q.total_czk);
    for quote in &rows {
        let option = quote.option.to_string();
        let pad = option_width - option.chars().count();
        let marker = if Some(quote.total_czk) == cheapest_total {
            "  <- cheapest"
        } else {
            ""
        };
        if multi_provider {
            print!("  {:<10}", quote.provider);
        }
        println!(
            "  {:<10} {:<8} {}{} {:>12}{}",
            quote.tariff.to_string(),
            quote.car_type.to_string(),
            option,
            " ".repeat(pad),
            quote.total_czk,
            marker
        );
        if show_all {
            println!("      {}", quote.reason);
        }
    }

    if !show_all && result.quotes.len() > rows.len() {
        println!(
            "\n  {} more option(s) hidden, use --all to list them",
            result.quotes.len() - rows.len()
        );
    }
}
