use arena_core::GameError;
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::SmallRng;

use crate::map::GameMap;
use crate::region::Region;

const BLUR_OWN_WEIGHT: f64 = 0.66667;

/// Builds a deterministic, symmetric `(W, H)` board seeded with one owner
/// cell per player. `num_players` must be at least 1; the effective board
/// may come back smaller than `(width, height)` after chunk trimming.
pub fn generate(width: u16, height: u16, num_players: u8, seed: u64) -> Result<GameMap, GameError> {
    log::debug!("generating map {}x{} for {} players, seed {}", width, height, num_players, seed);
    if num_players == 0 {
        return Err(GameError::GenerationError("num_players must be >= 1".into()));
    }
    if num_players > arena_core::MAX_PLAYERS {
        return Err(GameError::GenerationError(format!(
            "num_players must be <= {}, got {}",
            arena_core::MAX_PLAYERS,
            num_players
        )));
    }
    let p = num_players as usize;
    let mut rng = SmallRng::seed_from_u64(seed);

    // 1. tiling orientation
    let prefer_horizontal = rng.random_range(0u32..2) == 1;
    let (dh, dw) = if prefer_horizontal {
        let dh = largest_divisor_leq_sqrt(p);
        (dh, p / dh)
    } else {
        let dw = largest_divisor_leq_sqrt(p);
        (p / dw, dw)
    };
    if dh == 0 || dw == 0 {
        return Err(GameError::GenerationError("degenerate tiling".into()));
    }

    // 2. chunk sizes, trimmed to a multiple of P
    let mut cw = width as usize / dw;
    let mut ch = height as usize / dh;
    if cw == 0 || ch == 0 {
        return Err(GameError::GenerationError(
            "requested board too small for player count".into(),
        ));
    }
    if prefer_horizontal {
        while ch % p != 0 {
            ch -= 1;
            if ch == 0 {
                return Err(GameError::GenerationError("chunk trim collapsed height".into()));
            }
        }
    } else {
        while cw % p != 0 {
            cw -= 1;
            if cw == 0 {
                return Err(GameError::GenerationError("chunk trim collapsed width".into()));
            }
        }
    }

    let self_width = cw * dw;
    let self_height = ch * dh;
    if self_width == 0 || self_height == 0 {
        return Err(GameError::GenerationError("effective board collapsed to zero".into()));
    }
    if self_width != width as usize || self_height != height as usize {
        log::warn!(
            "effective board {}x{} is smaller than requested {}x{} after chunk trimming",
            self_width, self_height, width, height
        );
    }

    // 3. factor kernels
    let prod_chunk = Region::new(cw, ch, &mut rng).get_factors();
    let str_chunk = Region::new(cw, ch, &mut rng).get_factors();

    // 4. tesselate
    let mut owner = vec![0u8; self_height * self_width];
    let mut prod = vec![0.0f64; self_height * self_width];
    let mut strg = vec![0.0f64; self_height * self_width];

    for a in 0..dh {
        for b in 0..dw {
            let base_y = a * ch;
            let base_x = b * cw;
            for c in 0..ch {
                for d in 0..cw {
                    let idx = (base_y + c) * self_width + (base_x + d);
                    prod[idx] = prod_chunk[c][d];
                    strg[idx] = str_chunk[c][d];
                }
            }
            let cy = base_y + ch / 2;
            let cx = base_x + cw / 2;
            owner[cy * self_width + cx] = (a * dw + b + 1) as u8;
        }
    }

    // 5. reflect
    let reflect_v = dh % 2 == 0;
    let reflect_h = dw % 2 == 0;
    let mut r_owner = vec![0u8; self_height * self_width];
    let mut r_prod = vec![0.0f64; self_height * self_width];
    let mut r_str = vec![0.0f64; self_height * self_width];

    for a in 0..dh {
        for b in 0..dw {
            let vref = reflect_v && (a % 2 == 1);
            let href = reflect_h && (b % 2 == 1);
            let base_y = a * ch;
            let base_x = b * cw;
            for c in 0..ch {
                for d in 0..cw {
                    let y = base_y + c;
                    let x = base_x + d;
                    let y0 = base_y + if vref { ch - 1 - c } else { c };
                    let x0 = base_x + if href { cw - 1 - d } else { d };
                    let dst = y * self_width + x;
                    let src = y0 * self_width + x0;
                    r_owner[dst] = owner[src];
                    r_prod[dst] = prod[src];
                    r_str[dst] = strg[src];
                }
            }
        }
    }

    // 6. shift (skipped for 6 players)
    let (mut s_owner, mut s_prod, mut s_str);
    if num_players == 6 {
        s_owner = r_owner.clone();
        s_prod = r_prod.clone();
        s_str = r_str.clone();
    } else if prefer_horizontal {
        let shift = rng.random_range(0..dw) * (self_height / dw);
        s_owner = vec![0u8; self_height * self_width];
        s_prod = vec![0.0f64; self_height * self_width];
        s_str = vec![0.0f64; self_height * self_width];
        for a in 0..dh {
            for b in 0..dw {
                let base_y = a * ch;
                let base_x = b * cw;
                for c in 0..ch {
                    let y = base_y + c;
                    let y0 = (base_y + b * shift + c) % self_height;
                    for d in 0..cw {
                        let x = base_x + d;
                        let dst = y * self_width + x;
                        let src = y0 * self_width + x;
                        s_owner[dst] = r_owner[src];
                        s_prod[dst] = r_prod[src];
                        s_str[dst] = r_str[src];
                    }
                }
            }
        }
    } else {
        let shift = rng.random_range(0..dh) * (self_width / dh);
        s_owner = vec![0u8; self_height * self_width];
        s_prod = vec![0.0f64; self_height * self_width];
        s_str = vec![0.0f64; self_height * self_width];
        for a in 0..dh {
            for b in 0..dw {
                let base_y = a * ch;
                let base_x = b * cw;
                for c in 0..ch {
                    let y = base_y + c;
                    for d in 0..cw {
                        let x = base_x + d;
                        let x0 = (base_x + a * shift + d) % self_width;
                        let dst = y * self_width + x;
                        let src = y * self_width + x0;
                        s_owner[dst] = r_owner[src];
                        s_prod[dst] = r_prod[src];
                        s_str[dst] = r_str[src];
                    }
                }
            }
        }
    }

    // 7. blur
    let n_iter = (2.0 * ((self_width * self_height) as f64).sqrt() / 10.0) as usize + 1;
    for _ in 0..n_iter {
        s_prod = toroidal_blur(&s_prod, self_height, self_width, BLUR_OWN_WEIGHT);
        s_str = toroidal_blur(&s_str, self_height, self_width, BLUR_OWN_WEIGHT);
    }

    // 8. scale to integer production/strength
    let prod_max = s_prod.iter().cloned().fold(0.0f64, f64::max);
    let str_max = s_str.iter().cloned().fold(0.0f64, f64::max);
    let top_prod = rng.random_range(0u32..10) + 6;
    let top_str = rng.random_range(0u32..106) + 150;

    let mut prod_scaled: Vec<u8> = s_prod
        .iter()
        .map(|v| scale_to_u8(*v, prod_max, top_prod))
        .collect();
    let str_scaled: Vec<u8> = s_str
        .iter()
        .map(|v| scale_to_u8(*v, str_max, top_str))
        .collect();

    // 9. fix-up: owned cells must have production >= 1
    for (idx, &owner_id) in s_owner.iter().enumerate() {
        if owner_id != 0 && prod_scaled[idx] == 0 {
            prod_scaled[idx] = 1;
        }
    }

    log::debug!("map generation complete: {}x{}", self_width, self_height);
    Ok(GameMap {
        width: self_width as u16,
        height: self_height as u16,
        num_players,
        seed,
        owner: s_owner,
        production: prod_scaled,
        strength: str_scaled,
    })
}

fn scale_to_u8(value: f64, max: f64, top: u32) -> u8 {
    if max <= 0.0 {
        return 0;
    }
    ((value / max) * top as f64).round().clamp(0.0, 255.0) as u8
}

fn toroidal_blur(grid: &[f64], height: usize, width: usize, own_weight: f64) -> Vec<f64> {
    let mut out = vec![0.0f64; grid.len()];
    let neighbour_weight = (1.0 - own_weight) / 4.0;
    for y in 0..height {
        let up = (y + height - 1) % height;
        let down = (y + 1) % height;
        for x in 0..width {
            let left = (x + width - 1) % width;
            let right = (x + 1) % width;
            out[y * width + x] = own_weight * grid[y * width + x]
                + neighbour_weight
                    * (grid[up * width + x]
                        + grid[down * width + x]
                        + grid[y * width + left]
                        + grid[y * width + right]);
        }
    }
    out
}

/// Largest divisor of `p` that is `<= floor(sqrt(p))`.
fn largest_divisor_leq_sqrt(p: usize) -> usize {
    let mut d = p.isqrt().max(1);
    while p % d != 0 {
        d -= 1;
    }
    d
}
