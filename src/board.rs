use rand::seq::{IndexedRandom, SliceRandom};
use rand::Rng;
use uuid::Uuid;

/// Fixed classroom size. Seat indices are stable for the session.
pub const SEAT_COUNT: usize = 32;

#[derive(Debug, Clone, PartialEq)]
pub struct Student {
    pub id: String,
    pub number: String,
    pub name: String,
}

/// One row of imported roster data. `number` is optional because the source
/// table may lack a number column; the board fills it positionally.
#[derive(Debug, Clone)]
pub struct RosterRow {
    pub number: Option<String>,
    pub name: String,
}

/// In-memory seating chart: 32 seats, each empty or holding one student.
/// Student names are non-empty by construction; clearing a name clears
/// the seat instead of leaving a blank record.
pub struct SeatBoard {
    seats: Vec<Option<Student>>,
}

impl SeatBoard {
    pub fn new() -> Self {
        SeatBoard {
            seats: vec![None; SEAT_COUNT],
        }
    }

    pub fn seats(&self) -> &[Option<Student>] {
        &self.seats
    }

    /// Occupied students in seat order. This is the roulette candidate pool.
    pub fn occupied(&self) -> Vec<Student> {
        self.seats.iter().flatten().cloned().collect()
    }

    pub fn occupied_count(&self) -> usize {
        self.seats.iter().filter(|s| s.is_some()).count()
    }

    /// Manual edit of one seat. An empty/whitespace name removes the student.
    /// Editing an occupied seat keeps the student's id (update in place);
    /// filling an empty seat assigns a fresh one.
    ///
    /// Callers must pass `index < SEAT_COUNT`; the IPC layer validates
    /// request indices before reaching this point.
    pub fn set_seat(&mut self, index: usize, number: &str, name: &str) {
        let name = name.trim();
        if name.is_empty() {
            self.seats[index] = None;
            return;
        }
        let id = match &self.seats[index] {
            Some(existing) => existing.id.clone(),
            None => Uuid::new_v4().to_string(),
        };
        self.seats[index] = Some(Student {
            id,
            number: number.to_string(),
            name: name.to_string(),
        });
    }

    /// Wholesale replacement from imported rows. Row i maps to seat i; only
    /// the first 32 rows are used. A row with an empty name leaves its seat
    /// empty but still consumes the position, so gaps in the source table
    /// stay gaps on the board. A missing number defaults to the 1-based
    /// position, matching the template convention.
    ///
    /// Returns (loaded, skipped) row counts over the considered rows.
    pub fn bulk_load(&mut self, rows: &[RosterRow]) -> (usize, usize) {
        self.seats = vec![None; SEAT_COUNT];
        let mut loaded = 0;
        let mut skipped = 0;
        for (idx, row) in rows.iter().take(SEAT_COUNT).enumerate() {
            let name = row.name.trim();
            if name.is_empty() {
                skipped += 1;
                continue;
            }
            let number = match &row.number {
                Some(n) if !n.trim().is_empty() => n.trim().to_string(),
                _ => (idx + 1).to_string(),
            };
            self.seats[idx] = Some(Student {
                id: Uuid::new_v4().to_string(),
                number,
                name: name.to_string(),
            });
            loaded += 1;
        }
        (loaded, skipped)
    }

    /// Random re-seating: Fisher-Yates over the occupied students, then
    /// repack into seats 0..k-1 and clear the rest. The id multiset is
    /// unchanged; only seat assignment moves.
    pub fn shuffle(&mut self, rng: &mut impl Rng) {
        let mut students = self.occupied();
        students.shuffle(rng);
        self.seats = vec![None; SEAT_COUNT];
        for (idx, student) in students.into_iter().enumerate() {
            self.seats[idx] = Some(student);
        }
    }

    pub fn reset(&mut self) {
        self.seats = vec![None; SEAT_COUNT];
    }
}

impl Default for SeatBoard {
    fn default() -> Self {
        Self::new()
    }
}

/// Uniform draw over a non-empty candidate pool. Returns None on an empty
/// pool; the caller rejects that case before any reveal sequencing starts.
pub fn draw_candidate<'a>(pool: &'a [Student], rng: &mut impl Rng) -> Option<&'a Student> {
    pool.choose(rng)
}
