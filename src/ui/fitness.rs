use super::{delete_button, escape_html, render_page, render_table};
use crate::collection::Document;
use crate::fitness::{DailyLog, Exercise, Food, EXERCISE_LIST, FOOD_LIST, LOG_LIST};

pub fn render_fitness(
    log: &DailyLog<'_>,
    foods: &[&Document<Food>],
    exercises: &[&Document<Exercise>],
) -> String {
    let date = log.date.to_string();
    let totals = log.totals;

    let log_table = render_table(&LOG_LIST, &log.rows, |doc| {
        delete_button(
            &format!("/fitness/logs/{}/delete", doc.id),
            &[("date", date.as_str())],
        )
    });
    let food_table = render_table(&FOOD_LIST, foods, |_| String::new());
    let exercise_table = render_table(&EXERCISE_LIST, exercises, |_| String::new());

    let body = format!(
        r#"<header>
  <h1>Fitness</h1>
  <p class="subtitle">{date}</p>
</header>
<section class="toolbar">
  <form method="get" action="/fitness" class="toolbar">
    <label>Day <input type="date" name="date" value="{date}" /></label>
    <button class="btn" type="submit">Show</button>
  </form>
</section>
<section class="panel">
  <div class="stat"><span class="label">Calories in</span><span class="value">{cal_in}</span></div>
  <div class="stat"><span class="label">Calories out</span><span class="value">{cal_out}</span></div>
  <div class="stat"><span class="label">Net</span><span class="value">{net}</span></div>
  <div class="stat"><span class="label">Protein</span><span class="value">{protein:.1} g</span></div>
</section>
<section class="card">
  <h2>Log food</h2>
  <form method="post" action="/fitness/logs/food" class="grid">
    <label>Food <select name="food_id" required>{food_options}</select></label>
    <label>Servings <input type="number" step="0.25" min="0" name="servings" value="1" required /></label>
    <input type="hidden" name="date" value="{date}" />
    <div><button class="btn primary" type="submit">Log</button></div>
  </form>
</section>
<section class="card">
  <h2>Log exercise</h2>
  <form method="post" action="/fitness/logs/exercise" class="grid">
    <label>Exercise <select name="exercise_id" required>{exercise_options}</select></label>
    <label>Minutes <input type="number" step="1" min="0" name="minutes" required /></label>
    <label>Weight (kg) <input type="number" step="0.1" min="0" name="weight_kg" required /></label>
    <label>Note <input name="note" /></label>
    <input type="hidden" name="date" value="{date}" />
    <div><button class="btn primary" type="submit">Log</button></div>
  </form>
</section>
<section class="card">
  <h2>Today's log</h2>
  {log_table}
</section>
<section class="card">
  <h2>Foods</h2>
  <form method="post" action="/fitness/foods" class="grid">
    <label>Name <input name="name" required /></label>
    <label>Serving <input name="serving" placeholder="1 cup" /></label>
    <label>kcal <input type="number" step="1" min="0" name="calories" required /></label>
    <label>Protein (g) <input type="number" step="0.1" min="0" name="protein" /></label>
    <input type="hidden" name="date" value="{date}" />
    <div><button class="btn" type="submit">Add food</button></div>
  </form>
  {food_table}
</section>
<section class="card">
  <h2>Exercises</h2>
  <form method="post" action="/fitness/exercises" class="grid">
    <label>Name <input name="name" required /></label>
    <label>MET <input type="number" step="0.1" min="0" name="met" required /></label>
    <input type="hidden" name="date" value="{date}" />
    <div><button class="btn" type="submit">Add exercise</button></div>
  </form>
  {exercise_table}
</section>"#,
        cal_in = totals.calories_in,
        cal_out = totals.calories_out,
        net = totals.net,
        protein = totals.protein,
        food_options = options(foods, |food| &food.name),
        exercise_options = options(exercises, |exercise| &exercise.name),
    );

    render_page("Fitness", "Fitness", &body)
}

fn options<T>(docs: &[&Document<T>], name: impl Fn(&T) -> &String) -> String {
    docs.iter()
        .map(|doc| {
            format!(
                "<option value=\"{}\">{}</option>",
                escape_html(&doc.id),
                escape_html(name(&doc.fields))
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collection::{Collection, ListQuery};
    use crate::fitness::{daily_log, food_entry};
    use chrono::{NaiveDate, Utc};

    #[test]
    fn page_shows_catalog_choices_and_daily_rows() {
        let day = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let mut foods = Collection::default();
        let food = foods
            .insert(
                Food {
                    name: "Eggs".into(),
                    serving: "2 large".into(),
                    calories: 140.0,
                    protein: 12.0,
                },
                Utc::now(),
            )
            .unwrap()
            .clone();
        let mut logs = Collection::default();
        logs.insert(food_entry(day, &food, 2.0).unwrap(), Utc::now()).unwrap();

        let log = daily_log(&logs, day);
        let food_rows = foods.query(&ListQuery::default());
        let html = render_fitness(&log, &food_rows, &[]);

        assert!(html.contains(&format!("<option value=\"{}\">Eggs</option>", food.id)));
        assert!(html.contains("<td>280</td>"));
        assert!(html.contains("24.0 g"));
        assert!(html.contains("No exercises yet"));
    }
}
