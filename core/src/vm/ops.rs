//! Opcode handlers.
//!
//! Core opcodes 0x00..=0x1A have fixed operand layouts; the two polygon
//! families above 0x40 fold operand addressing modes into the opcode
//! byte itself. Handlers fetch their operands, mutate the VM or the
//! host, and return; yielding is a flag the dispatch loop checks after
//! every instruction.

use log::{debug, warn};

use crate::audio::sfx::MusicModule;
use crate::audio::{Sample, frequency_for_index};
use crate::res::parts;
use crate::video::Point;

use super::{Host, PC_INACTIVE, PC_KILL, THREAD_COUNT, VirtualMachine, VmError, vars};

impl VirtualMachine {
    pub(super) fn execute_opcode(
        &mut self,
        opcode: u8,
        host: &mut Host<'_>,
    ) -> Result<(), VmError> {
        match opcode {
            0x00 => self.op_seti(host),
            0x01 => self.op_setr(host),
            0x02 => self.op_addr(host),
            0x03 => self.op_addi(host),
            0x04 => self.op_call(host),
            0x05 => self.op_ret(),
            0x06 => self.op_yield(),
            0x07 => self.op_jump(host),
            0x08 => self.op_start(host),
            0x09 => self.op_dbra(host),
            0x0A => self.op_cjmp(host),
            0x0B => self.op_fade(host),
            0x0C => self.op_reset(host),
            0x0D => self.op_page(host),
            0x0E => self.op_fill(host),
            0x0F => self.op_copy(host),
            0x10 => self.op_show(host),
            0x11 => self.op_halt(),
            0x12 => self.op_print(host),
            0x13 => self.op_subr(host),
            0x14 => self.op_andi(host),
            0x15 => self.op_iori(host),
            0x16 => self.op_lsli(host),
            0x17 => self.op_lsri(host),
            0x18 => self.op_sound(host),
            0x19 => self.op_load(host),
            0x1A => self.op_music(host),

            op if op & 0x80 != 0 => self.op_draw_poly_background(op, host),
            op if op & 0x40 != 0 => self.op_draw_poly_sprite(op, host),

            // 0x1B..=0x3F: reserved encodings the shipped bytecode never
            // reaches; consume the opcode and continue.
            op => {
                warn!(target: "vm", "reserved opcode 0x{op:02X} at pc 0x{:04X}", self.pc - 1);
                Ok(())
            }
        }
    }

    // -- register arithmetic ------------------------------------------------

    fn op_seti(&mut self, host: &mut Host<'_>) -> Result<(), VmError> {
        let reg = self.fetch_byte(host.res)? as usize;
        let value = self.fetch_word(host.res)? as i16;
        self.regs[reg] = value;
        Ok(())
    }

    fn op_setr(&mut self, host: &mut Host<'_>) -> Result<(), VmError> {
        let dst = self.fetch_byte(host.res)? as usize;
        let src = self.fetch_byte(host.res)? as usize;
        self.regs[dst] = self.regs[src];
        Ok(())
    }

    fn op_addr(&mut self, host: &mut Host<'_>) -> Result<(), VmError> {
        let dst = self.fetch_byte(host.res)? as usize;
        let src = self.fetch_byte(host.res)? as usize;
        self.regs[dst] = self.regs[dst].wrapping_add(self.regs[src]);
        Ok(())
    }

    fn op_addi(&mut self, host: &mut Host<'_>) -> Result<(), VmError> {
        let reg = self.fetch_byte(host.res)? as usize;
        let value = self.fetch_word(host.res)? as i16;
        self.regs[reg] = self.regs[reg].wrapping_add(value);
        Ok(())
    }

    fn op_subr(&mut self, host: &mut Host<'_>) -> Result<(), VmError> {
        let dst = self.fetch_byte(host.res)? as usize;
        let src = self.fetch_byte(host.res)? as usize;
        self.regs[dst] = self.regs[dst].wrapping_sub(self.regs[src]);
        Ok(())
    }

    fn op_andi(&mut self, host: &mut Host<'_>) -> Result<(), VmError> {
        let reg = self.fetch_byte(host.res)? as usize;
        let value = self.fetch_word(host.res)?;
        self.regs[reg] = (self.regs[reg] as u16 & value) as i16;
        Ok(())
    }

    fn op_iori(&mut self, host: &mut Host<'_>) -> Result<(), VmError> {
        let reg = self.fetch_byte(host.res)? as usize;
        let value = self.fetch_word(host.res)?;
        self.regs[reg] = (self.regs[reg] as u16 | value) as i16;
        Ok(())
    }

    fn op_lsli(&mut self, host: &mut Host<'_>) -> Result<(), VmError> {
        let reg = self.fetch_byte(host.res)? as usize;
        let value = self.fetch_word(host.res)?;
        self.regs[reg] = ((self.regs[reg] as u16) << (value & 0x0F)) as i16;
        Ok(())
    }

    fn op_lsri(&mut self, host: &mut Host<'_>) -> Result<(), VmError> {
        let reg = self.fetch_byte(host.res)? as usize;
        let value = self.fetch_word(host.res)?;
        self.regs[reg] = (self.regs[reg] as u16 >> (value & 0x0F)) as i16;
        Ok(())
    }

    // -- control flow -------------------------------------------------------

    fn op_call(&mut self, host: &mut Host<'_>) -> Result<(), VmError> {
        let addr = self.fetch_word(host.res)?;
        if self.stack_ptr >= self.stack.len() {
            return Err(VmError::StackOverflow { pc: self.pc as u16 });
        }
        self.stack[self.stack_ptr] = self.pc as u16;
        self.stack_ptr += 1;
        self.jump_to(addr, host.res)
    }

    fn op_ret(&mut self) -> Result<(), VmError> {
        if self.stack_ptr == 0 {
            return Err(VmError::StackUnderflow { pc: self.pc as u16 });
        }
        self.stack_ptr -= 1;
        self.pc = self.stack[self.stack_ptr] as usize;
        Ok(())
    }

    fn op_yield(&mut self) -> Result<(), VmError> {
        self.yielded = true;
        Ok(())
    }

    fn op_halt(&mut self) -> Result<(), VmError> {
        self.pc = PC_INACTIVE as usize;
        self.yielded = true;
        Ok(())
    }

    fn op_jump(&mut self, host: &mut Host<'_>) -> Result<(), VmError> {
        let addr = self.fetch_word(host.res)?;
        self.jump_to(addr, host.res)
    }

    fn op_start(&mut self, host: &mut Host<'_>) -> Result<(), VmError> {
        let thread = self.fetch_byte(host.res)? as usize;
        let addr = self.fetch_word(host.res)?;
        self.threads[thread & (THREAD_COUNT - 1)].pc_next = Some(addr);
        Ok(())
    }

    fn op_dbra(&mut self, host: &mut Host<'_>) -> Result<(), VmError> {
        let reg = self.fetch_byte(host.res)? as usize;
        let addr = self.fetch_word(host.res)?;
        self.regs[reg] = self.regs[reg].wrapping_sub(1);
        if self.regs[reg] != 0 {
            self.jump_to(addr, host.res)?;
        }
        Ok(())
    }

    fn op_cjmp(&mut self, host: &mut Host<'_>) -> Result<(), VmError> {
        let variant = self.fetch_byte(host.res)?;
        let reg = self.fetch_byte(host.res)? as usize;
        let lhs = self.regs[reg];

        let rhs = if variant & 0x80 != 0 {
            let src = self.fetch_byte(host.res)? as usize;
            self.regs[src]
        } else if variant & 0x40 != 0 {
            self.fetch_word(host.res)? as i16
        } else {
            // An unsigned byte, not sign-extended; the shipped bytecode
            // relies on it.
            self.fetch_byte(host.res)? as i16
        };
        let addr = self.fetch_word(host.res)?;

        let taken = match variant & 0x07 {
            0 => lhs == rhs,
            1 => lhs != rhs,
            2 => lhs > rhs,
            3 => lhs >= rhs,
            4 => lhs < rhs,
            5 => lhs <= rhs,
            other => {
                warn!(target: "vm", "cjmp: bad comparator {other}");
                false
            }
        };
        if taken {
            self.jump_to(addr, host.res)?;
        }
        Ok(())
    }

    fn op_reset(&mut self, host: &mut Host<'_>) -> Result<(), VmError> {
        let first = self.fetch_byte(host.res)? as usize;
        let last = (self.fetch_byte(host.res)? & 0x3F) as usize;
        let mode = self.fetch_byte(host.res)?;

        if last < first {
            warn!(target: "vm", "reset: empty thread range {first}..{last}");
            return Ok(());
        }

        match mode {
            // Kill: commits as an inactive pc, via the sentinel so a
            // same-frame START cannot resurrect the thread.
            2 => {
                for thread in &mut self.threads[first..=last] {
                    thread.pc_next = Some(PC_KILL);
                }
            }
            0 | 1 => {
                for thread in &mut self.threads[first..=last] {
                    thread.paused_next = Some(mode == 1);
                }
            }
            _ => warn!(target: "vm", "reset: bad mode {mode}"),
        }
        Ok(())
    }

    // -- video --------------------------------------------------------------

    fn op_fade(&mut self, host: &mut Host<'_>) -> Result<(), VmError> {
        let packed = self.fetch_word(host.res)?;
        host.video.request_palette((packed >> 8) as u8);
        Ok(())
    }

    fn op_page(&mut self, host: &mut Host<'_>) -> Result<(), VmError> {
        let page = self.fetch_byte(host.res)?;
        host.video.select_work_page(page);
        Ok(())
    }

    fn op_fill(&mut self, host: &mut Host<'_>) -> Result<(), VmError> {
        let page = self.fetch_byte(host.res)?;
        let color = self.fetch_byte(host.res)?;
        host.video.fill_page(page, color);
        Ok(())
    }

    fn op_copy(&mut self, host: &mut Host<'_>) -> Result<(), VmError> {
        let src = self.fetch_byte(host.res)?;
        let dst = self.fetch_byte(host.res)?;
        host.video.copy_page(src, dst, self.regs[vars::VAR_SCROLL_Y]);
        Ok(())
    }

    fn op_show(&mut self, host: &mut Host<'_>) -> Result<(), VmError> {
        let page = self.fetch_byte(host.res)?;
        self.regs[vars::VAR_FRAME_COUNTER] = 0;
        host.video.show(page);
        Ok(())
    }

    fn op_print(&mut self, host: &mut Host<'_>) -> Result<(), VmError> {
        let string_id = self.fetch_word(host.res)?;
        let x = self.fetch_byte(host.res)?;
        let y = self.fetch_byte(host.res)?;
        let color = self.fetch_byte(host.res)?;
        host.video.draw_string(string_id, x, y, color);
        Ok(())
    }

    fn op_draw_poly_background(&mut self, opcode: u8, host: &mut Host<'_>) -> Result<(), VmError> {
        let low = self.fetch_byte(host.res)? as u16;
        let offset = (((opcode as u16 & 0x7F) << 8 | low) * 2) as usize;

        let mut x = self.fetch_byte(host.res)? as i16;
        let mut y = self.fetch_byte(host.res)? as i16;
        // Vertical overflow folds into x, as the original packing had it.
        let overflow = y - 199;
        if overflow > 0 {
            y = 199;
            x += overflow;
        }

        let Host { res, video, .. } = host;
        video.draw_shape(res.cinematic(), offset, 0xFF, 0x40, Point { x, y });
        Ok(())
    }

    fn op_draw_poly_sprite(&mut self, opcode: u8, host: &mut Host<'_>) -> Result<(), VmError> {
        let offset = self.fetch_word(host.res)? as usize * 2;

        let x = match opcode & 0x30 {
            0x00 => self.fetch_word(host.res)? as i16,
            0x10 => {
                let reg = self.fetch_byte(host.res)? as usize;
                self.regs[reg]
            }
            0x20 => self.fetch_byte(host.res)? as i16,
            _ => self.fetch_byte(host.res)? as i16 + 0x100,
        };
        let y = match opcode & 0x0C {
            0x00 => self.fetch_word(host.res)? as i16,
            0x04 => {
                let reg = self.fetch_byte(host.res)? as usize;
                self.regs[reg]
            }
            _ => self.fetch_byte(host.res)? as i16,
        };

        let mut use_sub_segment = false;
        let zoom = match opcode & 0x03 {
            0x00 => 0x40,
            0x01 => {
                let reg = self.fetch_byte(host.res)? as usize;
                self.regs[reg] as u16
            }
            0x02 => self.fetch_byte(host.res)? as u16,
            _ => {
                use_sub_segment = true;
                0x40
            }
        };

        let Host { res, video, .. } = host;
        let segment = if use_sub_segment {
            res.sub_cinematic()
        } else {
            res.cinematic()
        };
        video.draw_shape(segment, offset, 0xFF, zoom, Point { x, y });
        Ok(())
    }

    // -- audio and resources ------------------------------------------------

    fn op_sound(&mut self, host: &mut Host<'_>) -> Result<(), VmError> {
        let res_id = self.fetch_word(host.res)?;
        let freq_index = self.fetch_byte(host.res)?;
        let volume = self.fetch_byte(host.res)?;
        let channel = self.fetch_byte(host.res)?;
        debug!(target: "vm", "sound 0x{res_id:02X} freq {freq_index} vol {volume} ch {channel}");

        if volume == 0 {
            host.audio.lock().unwrap().mixer.stop(channel);
            return Ok(());
        }
        let Some(sample) = host.res.resource_bytes(res_id).and_then(Sample::parse) else {
            warn!(target: "vm", "sound: resource 0x{res_id:02X} not loaded");
            return Ok(());
        };
        host.audio.lock().unwrap().mixer.play(
            channel,
            sample,
            frequency_for_index(freq_index),
            volume.min(0x3F),
        );
        Ok(())
    }

    fn op_music(&mut self, host: &mut Host<'_>) -> Result<(), VmError> {
        let res_id = self.fetch_word(host.res)?;
        let delay = self.fetch_word(host.res)?;
        let position = self.fetch_byte(host.res)?;
        debug!(target: "vm", "music 0x{res_id:02X} delay {delay} pos {position}");

        if res_id != 0 {
            let module = host
                .res
                .resource_bytes(res_id)
                .and_then(|bytes| MusicModule::parse(bytes, |id| host.res.resource_bytes(id)));
            match module {
                Some(module) => host.audio.lock().unwrap().player.play(module, delay, position),
                None => warn!(target: "vm", "music: resource 0x{res_id:02X} not loaded"),
            }
        } else if delay != 0 {
            host.audio.lock().unwrap().player.set_events_delay(delay);
        } else {
            host.audio.lock().unwrap().player.stop();
        }
        Ok(())
    }

    fn op_load(&mut self, host: &mut Host<'_>) -> Result<(), VmError> {
        let id = self.fetch_word(host.res)?;

        if id == 0 {
            // Purge transient resources; playback must stop first since
            // the samples go away with the arena.
            {
                let mut audio = host.audio.lock().unwrap();
                audio.player.stop();
                audio.mixer.stop_all();
            }
            host.res.invalidate_transient();
        } else if parts::is_part_id(id) {
            host.res.request_part(id);
        } else {
            host.res.request_load(id);
            let Host { res, video, .. } = host;
            res.update(|bitmap| video.copy_bitmap_to_page0(bitmap))
                .map_err(VmError::Resource)?;
        }
        Ok(())
    }
}
