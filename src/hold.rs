//! Resident memory region: allocate once, then touch every page on a timer.

use std::alloc::{self, Layout};
use std::ptr::NonNull;

use thiserror::Error;

#[derive(Debug, Error)]
#[error("failed to allocate {size} bytes of resident memory")]
pub struct AllocError {
    pub size: usize,
}

/// Souvislá oblast paměti držená rezidentní po celou dobu běhu procesu.
/// Má právě jednoho vlastníka a jednoho zapisovatele; velikost se po
/// alokaci už nikdy nemění.
pub struct ResidentRegion {
    ptr: NonNull<u8>,
    len: usize,
    page_size: usize,
}

impl ResidentRegion {
    /// Alokuje `len` bajtů, logicky vynulovaných. alloc_zeroed nechává
    /// stránky na líném zero-page mapování jádra - fyzicky se přivlastní
    /// až prvním zápisem, což obstará touch_pass. `len == 0` je legální
    /// a nic nealokuje.
    pub fn allocate(len: usize) -> Result<Self, AllocError> {
        let page_size = page_size();
        if len == 0 {
            return Ok(Self {
                ptr: NonNull::dangling(),
                len: 0,
                page_size,
            });
        }

        let layout =
            Layout::from_size_align(len, page_size).map_err(|_| AllocError { size: len })?;
        // SAFETY: layout má nenulovou velikost.
        let raw = unsafe { alloc::alloc_zeroed(layout) };
        let ptr = NonNull::new(raw).ok_or(AllocError { size: len })?;

        Ok(Self {
            ptr,
            len,
            page_size,
        })
    }

    pub fn len(&self) -> usize {
        self.len
    }

    /// Zapíše jeden bajt na začátek každé stránky, ve vzestupném pořadí
    /// offsetů. Hodnota `offset % 256` rotuje stránku od stránky a zápis
    /// je volatile, takže ho optimalizátor nemůže vypustit jako no-op.
    /// Záměrně se dotýkáme jen prvního bajtu stránky, ne celé stránky.
    pub fn touch_pass(&mut self) {
        let mut offset = 0;
        while offset < self.len {
            // SAFETY: offset < len, oblast vlastníme výhradně.
            unsafe {
                self.ptr
                    .as_ptr()
                    .add(offset)
                    .write_volatile((offset % 256) as u8);
            }
            offset += self.page_size;
        }
    }

    #[cfg(test)]
    fn as_slice(&self) -> &[u8] {
        if self.len == 0 {
            return &[];
        }
        // SAFETY: ptr/len popisují platnou, nulami inicializovanou alokaci.
        unsafe { std::slice::from_raw_parts(self.ptr.as_ptr(), self.len) }
    }
}

impl Drop for ResidentRegion {
    fn drop(&mut self) {
        if self.len > 0 {
            // SAFETY: stejný layout jako při alokaci (validovaný tamtéž).
            unsafe {
                let layout = Layout::from_size_align_unchecked(self.len, self.page_size);
                alloc::dealloc(self.ptr.as_ptr(), layout);
            }
        }
    }
}

// Jediný zapisovatel, žádné aliasy - přesun mezi vlákny je bezpečný.
unsafe impl Send for ResidentRegion {}

/// Velikost stránky podle sysconf, s fallbackem 4096 kdyby selhal.
fn page_size() -> usize {
    let v = unsafe { libc::sysconf(libc::_SC_PAGESIZE) };
    if v <= 0 { 4096 } else { v as usize }
}

/// Cílová velikost alokace v bajtech: MB = percent * total / 1024,
/// bajty = MB * 1024 * 1024 (stejná jednotková aritmetika jako zdroj metrik,
/// hodnoty v kB).
pub fn target_bytes(percent: f64, total_kb: u64) -> u64 {
    let mb = percent * total_kb as f64 / 1024.0;
    (mb * 1024.0 * 1024.0) as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_touch_pass_writes_every_page_start() {
        let page = page_size();
        let mut region = ResidentRegion::allocate(3 * page + 17).unwrap();
        region.touch_pass();

        let data = region.as_slice();
        let mut offset = 0;
        while offset < data.len() {
            assert_eq!(data[offset], (offset % 256) as u8, "page at offset {offset}");
            offset += page;
        }
    }

    #[test]
    fn touch_only_hits_the_first_byte_of_each_page() {
        let page = page_size();
        let mut region = ResidentRegion::allocate(2 * page).unwrap();
        region.touch_pass();

        let data = region.as_slice();
        assert_eq!(data[1], 0);
        assert_eq!(data[page - 1], 0);
        assert_eq!(data[page + 1], 0);
    }

    #[test]
    fn repeated_touch_pass_keeps_size_and_placement() {
        let len = 2 * page_size();
        let mut region = ResidentRegion::allocate(len).unwrap();
        let ptr_before = region.as_slice().as_ptr();

        region.touch_pass();
        region.touch_pass();

        assert_eq!(region.len(), len);
        assert_eq!(region.as_slice().as_ptr(), ptr_before);
    }

    #[test]
    fn zero_sized_region_is_a_noop() {
        let mut region = ResidentRegion::allocate(0).unwrap();
        region.touch_pass();
        assert_eq!(region.len(), 0);
    }

    #[test]
    fn target_bytes_matches_source_arithmetic() {
        // 25 % z 8000000 kB = 2000000 kB = 2048000000 bajtů.
        assert_eq!(target_bytes(0.25, 8_000_000), 2_048_000_000);
        assert_eq!(target_bytes(0.0, 8_000_000), 0);
    }
}
