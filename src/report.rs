// Accumulation of search results into the emailed report

use std::fmt;

use parking_lot::Mutex;

pub const RETURNING_SEPARATOR: &str = "=========== returning ===============";

// One searched flight. Built once from a completed search call and never
// changed afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flight {
    pub date: String,
    pub origin: String,
    pub destination: String,
    pub has_business: bool,
}

impl Flight {
    pub fn new(
        date: impl Into<String>,
        origin: impl Into<String>,
        destination: impl Into<String>,
        has_business: bool,
    ) -> Self {
        Self {
            date: date.into(),
            origin: origin.into(),
            destination: destination.into(),
            has_business,
        }
    }
}

impl fmt::Display for Flight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.has_business {
            write!(
                f,
                "Flight(date={}, {} ====> {}, has_business)",
                self.date, self.origin, self.destination
            )
        } else {
            write!(
                f,
                "Flight(date={}, {} ====> {})",
                self.date, self.origin, self.destination
            )
        }
    }
}

// Outbound and return flights discovered by one scheduler run. Search
// tasks complete in any order and append through a shared reference, so
// each leg sequence sits behind its own lock. Appends are the only
// mutation; the stored order is completion order.
#[derive(Debug, Default)]
pub struct Report {
    title: String,
    depart_flights: Mutex<Vec<Flight>>,
    return_flights: Mutex<Vec<Flight>>,
}

impl Report {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    // Append a completed search result. A `None` result (failed or
    // error-bearing search) is a no-op.
    pub fn add(&self, flight: Option<Flight>, is_return: bool) {
        let Some(flight) = flight else { return };
        if is_return {
            self.return_flights.lock().push(flight);
        } else {
            self.depart_flights.lock().push(flight);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.depart_flights.lock().is_empty() && self.return_flights.lock().is_empty()
    }

    // Render all flights one per line, outbound first, with the returning
    // separator only when any return flight exists.
    pub fn render(&self) -> String {
        let mut content = String::new();
        for flight in self.depart_flights.lock().iter() {
            content.push_str(&flight.to_string());
            content.push('\n');
        }
        let return_flights = self.return_flights.lock();
        if !return_flights.is_empty() {
            content.push_str(RETURNING_SEPARATOR);
            content.push('\n');
        }
        for flight in return_flights.iter() {
            content.push_str(&flight.to_string());
            content.push('\n');
        }
        content
    }
}
